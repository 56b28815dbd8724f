// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;

/// Represents the direction (`Input`, `Output` or `InOut`) and resolved bit
/// width of a port on the user module.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum IO {
    Input(usize),
    Output(usize),
    InOut(usize),
}

impl IO {
    /// Returns the width of the port in bits.
    pub fn width(&self) -> usize {
        match self {
            IO::Input(width) => *width,
            IO::Output(width) => *width,
            IO::InOut(width) => *width,
        }
    }

    /// Returns a new IO enum with the same direction but a different width.
    pub fn with_width(&self, width: usize) -> IO {
        match self {
            IO::Input(_) => IO::Input(width),
            IO::Output(_) => IO::Output(width),
            IO::InOut(_) => IO::InOut(width),
        }
    }

    /// Verilog keyword for the port direction.
    pub fn to_verilog_direction(&self) -> &'static str {
        match self {
            IO::Input(_) => "input",
            IO::Output(_) => "output",
            IO::InOut(_) => "inout",
        }
    }

    /// Direction tag used in the MPD port table of the AXI package.
    pub fn to_mpd_direction(&self) -> &'static str {
        match self {
            IO::Input(_) => "I",
            IO::Output(_) => "O",
            IO::InOut(_) => "IO",
        }
    }

    /// Direction tag used in `component.xml` port entries.
    pub fn to_ipxact_direction(&self) -> &'static str {
        match self {
            IO::Input(_) => "in",
            IO::Output(_) => "out",
            IO::InOut(_) => "inout",
        }
    }

    /// Direction tag used in the Qsys `_hw.tcl` conduit definition.
    pub fn to_qsys_direction(&self) -> &'static str {
        match self {
            IO::Input(_) => "Input",
            IO::Output(_) => "Output",
            IO::InOut(_) => "Inout",
        }
    }
}
