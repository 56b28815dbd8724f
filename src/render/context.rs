// SPDX-License-Identifier: Apache-2.0

use serde::Serialize;

use crate::{BusResource, ClassifiedParameter, ClassifiedPort};

/// One addressable region of the IP-XACT memory map. Every bus resource
/// becomes exactly one region.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MemoryRegion {
    /// Bus interface name, `<resource>_AXI`.
    pub name: String,
    pub datawidth: usize,
    pub master: bool,
    pub lite: bool,
    /// Size of the region in bytes, `2^ext_addrwidth`.
    pub range: u64,
}

impl MemoryRegion {
    pub fn new(resource: &BusResource, master: bool, ext_addrwidth: u32) -> MemoryRegion {
        MemoryRegion {
            name: format!("{}_AXI", resource.name),
            datawidth: resource.datawidth,
            master,
            lite: resource.lite,
            range: 1u64.checked_shl(ext_addrwidth).unwrap_or(u64::MAX),
        }
    }
}

/// Closed set of values a template may refer to. Fields a given artifact
/// does not need keep their defaults: empty lists, empty strings, `None`,
/// and the simulation settings of [`crate::BuildConfig::default`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RenderContext {
    pub userlogic_name: String,

    pub masterlist: Vec<BusResource>,
    pub slavelist: Vec<BusResource>,

    pub def_top_parameters: Vec<String>,
    pub def_bench_parameters: Vec<String>,
    pub def_top_localparams: Vec<String>,
    pub def_top_ioports: Vec<String>,
    pub name_top_parameters: Vec<String>,
    pub name_top_ioports: Vec<String>,

    pub ext_addrwidth: u32,
    pub ext_burstlength: u32,
    pub ext_burstlen_width: u32,

    pub single_clock: bool,

    pub hdlname: String,
    pub common_hdlname: String,
    pub testname: String,
    pub ipcore_version: String,

    /// Name of the copied memory image, if any.
    pub memimg: Option<String>,
    pub binfile: bool,
    pub usertestcode: String,

    pub simaddrwidth: u32,
    pub clock_hperiod_userlogic: u32,
    pub clock_hperiod_bus: u32,

    pub ignore_protocol_error: bool,

    pub mpd_parameters: Vec<ClassifiedParameter>,
    pub mpd_ports: Vec<ClassifiedPort>,
    pub tcl_parameters: Vec<ClassifiedParameter>,
    pub tcl_ports: Vec<ClassifiedPort>,

    pub memory_map: Vec<MemoryRegion>,
    pub ipxact_parameters: Vec<ClassifiedParameter>,
    pub ipxact_ports: Vec<ClassifiedPort>,
}

impl RenderContext {
    pub fn new(
        userlogic_name: impl AsRef<str>,
        masterlist: &[BusResource],
        slavelist: &[BusResource],
    ) -> RenderContext {
        RenderContext {
            userlogic_name: userlogic_name.as_ref().to_string(),
            masterlist: masterlist.to_vec(),
            slavelist: slavelist.to_vec(),
            ..Default::default()
        }
    }

    /// Sets the external burst length and derives its bit width.
    pub fn with_burstlength(mut self, burstlength: u32) -> RenderContext {
        self.ext_burstlength = burstlength;
        self.ext_burstlen_width = crate::util::clog2(burstlength.into());
        self
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        RenderContext {
            userlogic_name: String::new(),
            masterlist: Vec::new(),
            slavelist: Vec::new(),
            def_top_parameters: Vec::new(),
            def_bench_parameters: Vec::new(),
            def_top_localparams: Vec::new(),
            def_top_ioports: Vec::new(),
            name_top_parameters: Vec::new(),
            name_top_ioports: Vec::new(),
            ext_addrwidth: 32,
            ext_burstlength: 256,
            ext_burstlen_width: 8,
            single_clock: false,
            hdlname: String::new(),
            common_hdlname: String::new(),
            testname: String::new(),
            ipcore_version: String::new(),
            memimg: None,
            binfile: false,
            usertestcode: String::new(),
            simaddrwidth: 27,
            clock_hperiod_userlogic: 5,
            clock_hperiod_bus: 5,
            ignore_protocol_error: false,
            mpd_parameters: Vec::new(),
            mpd_ports: Vec::new(),
            tcl_parameters: Vec::new(),
            tcl_ports: Vec::new(),
            memory_map: Vec::new(),
            ipxact_parameters: Vec::new(),
            ipxact_ports: Vec::new(),
        }
    }
}
