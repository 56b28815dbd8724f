// SPDX-License-Identifier: Apache-2.0

use std::borrow::Cow;
use std::path::PathBuf;

/// Looks up template and boilerplate text by canonical file name.
pub trait TemplateSource {
    /// Returns the text stored under `file_name`, or `None` if this source
    /// does not provide it.
    fn lookup(&self, file_name: &str) -> Option<Cow<'_, str>>;
}

/// Templates compiled into the crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinTemplates;

macro_rules! builtin {
    ($name:expr, [$($file:literal),* $(,)?]) => {
        match $name {
            $($file => Some(include_str!(concat!("../../templates/", $file))),)*
            _ => None,
        }
    };
}

impl BuiltinTemplates {
    fn text(file_name: &str) -> Option<&'static str> {
        builtin!(
            file_name,
            [
                "node_general.txt",
                "node_axi.txt",
                "node_avalon.txt",
                "mpd.txt",
                "pao.txt",
                "xgui_tcl.txt",
                "component_xml.txt",
                "qsys_tcl.txt",
                "test_ipgen_axi.txt",
                "test_ipgen_avalon.txt",
                "Makefile.txt",
                "axi_master_interface.v",
                "axi_lite_master_interface.v",
                "axi_slave_interface.v",
                "axi_lite_slave_interface.v",
                "avalon_master_interface.v",
                "avalon_lite_master_interface.v",
                "avalon_slave_interface.v",
                "avalon_lite_slave_interface.v",
                "axi_master_fifo.v",
                "avalon_master_fifo.v",
                "pcore_tcl.tcl",
                "ipxact.xdc",
                "bd.tcl",
            ]
        )
    }
}

impl TemplateSource for BuiltinTemplates {
    fn lookup(&self, file_name: &str) -> Option<Cow<'_, str>> {
        Self::text(file_name).map(Cow::Borrowed)
    }
}

/// Templates read from a directory, one file per canonical name. Names the
/// directory does not provide fall back to the built-in set.
#[derive(Clone, Debug)]
pub struct DirTemplates {
    dir: PathBuf,
}

impl DirTemplates {
    pub fn new(dir: impl Into<PathBuf>) -> DirTemplates {
        DirTemplates { dir: dir.into() }
    }
}

impl TemplateSource for DirTemplates {
    fn lookup(&self, file_name: &str) -> Option<Cow<'_, str>> {
        match std::fs::read_to_string(self.dir.join(file_name)) {
            Ok(text) => Some(Cow::Owned(text)),
            Err(_) => BuiltinTemplates.lookup(file_name),
        }
    }
}
