// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::path::{Path, PathBuf};

use ipgen::{
    build, AnalysisError, AnalysisRequest, ArtifactSet, BuildConfig, ConfigError,
    InterfaceFamily, IpgenError, Renderer, VerilogAnalyzer,
};
use rstest::rstest;

const FOO: &str = r#"
module foo #
  (
   parameter W = 32,
   parameter NAME = "foo",
   parameter [7:0] INIT = 8'hA5,
   localparam BYTES = W / 8
  )
  (
   input wire CLK,
   input wire RST,
   input wire [W-1:0] din,
   output reg [7:0] led
  );

  ipgen_master_memory #(.W_D(64)) dma (.CLK(CLK), .RST(RST));
  ipgen_slave_lite_memory regs (.CLK(CLK), .RST(RST));

  always @(posedge CLK) led <= din[7:0] ^ INIT;
endmodule
"#;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

struct Workspace {
    dir: tempfile::TempDir,
    source: PathBuf,
}

impl Workspace {
    fn new(verilog: &str) -> Workspace {
        init_logger();
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("foo.v");
        fs::write(&source, verilog).unwrap();
        Workspace { dir, source }
    }

    fn out(&self) -> PathBuf {
        self.dir.path().join("out")
    }

    fn config(&self, family: InterfaceFamily) -> BuildConfig {
        let output = match family {
            InterfaceFamily::Generic => self.out().join("foo_top.v"),
            _ => self.out(),
        };
        BuildConfig {
            if_type: family,
            output: Some(output),
            ..Default::default()
        }
    }

    fn build(&self, config: &BuildConfig) -> ipgen::Result<ArtifactSet> {
        let request = AnalysisRequest::from_files("foo", &[&self.source]);
        let renderer = Renderer::builtin().unwrap();
        build(&VerilogAnalyzer::default(), &request, config, &renderer)
    }

    fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.out().join(relative)).unwrap()
    }
}

/// `<spirit:name>` of every `<entry>` inside `<section>` of a component.xml,
/// in document order. Panics if an entry has no name.
fn ipxact_names<'a>(xml: &'a str, section: &str, entry: &str) -> Vec<&'a str> {
    let open = format!("<spirit:{section}>");
    let close = format!("</spirit:{section}>");
    let start = xml.find(&open).unwrap() + open.len();
    let end = start + xml[start..].find(&close).unwrap();
    let body = &xml[start..end];
    let names: Vec<&str> = body
        .lines()
        .filter_map(|l| l.trim().strip_prefix("<spirit:name>"))
        .map(|l| l.strip_suffix("</spirit:name>").unwrap())
        .collect();
    let entries = body.matches(&format!("<spirit:{entry}>")).count()
        + body.matches(&format!("<spirit:{entry} ")).count();
    assert_eq!(entries, names.len(), "{section}: one name per {entry}");
    names
}

/// Relative paths of every file under `root`, sorted.
fn files_under(root: &Path) -> Vec<String> {
    fn walk(dir: &Path, root: &Path, out: &mut Vec<String>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(&path, root, out);
            } else {
                let rel = path.strip_prefix(root).unwrap();
                out.push(rel.to_string_lossy().replace('\\', "/"));
            }
        }
    }
    let mut out = Vec::new();
    walk(root, root, &mut out);
    out.sort();
    out
}

#[test]
fn generic_is_wrapper_then_user_logic() {
    let ws = Workspace::new(FOO);
    let config = ws.config(InterfaceFamily::Generic);
    ws.build(&config).unwrap();

    let text = ws.read("foo_top.v");
    assert!(text.starts_with("//"));
    let wrapper = text.find("module ipgen_foo").unwrap();
    let user = text.find("module foo").unwrap();
    assert!(wrapper < user);
    assert!(text.trim_end().ends_with("endmodule"));
    assert!(!text.contains("module ipgen_master_memory"));
    assert_eq!(files_under(&ws.out()), ["foo_top.v"]);
}

#[rstest]
#[case(InterfaceFamily::Generic)]
#[case(InterfaceFamily::Axi)]
#[case(InterfaceFamily::Avalon)]
fn clock_mismatch_writes_nothing(#[case] family: InterfaceFamily) {
    let ws = Workspace::new(FOO);
    let config = BuildConfig {
        single_clock: true,
        hperiod_ulogic: 5,
        hperiod_bus: 10,
        ..ws.config(family)
    };
    let err = ws.build(&config).unwrap_err();
    assert!(matches!(
        err,
        IpgenError::Config(ConfigError::ClockPeriodMismatch { .. })
    ));
    assert!(err.to_string().contains("All clock periods should be same"));
    assert!(!ws.out().exists());
}

#[test]
fn axi_mpd_rows_follow_declaration_order() {
    let ws = Workspace::new(FOO);
    ws.build(&ws.config(InterfaceFamily::Axi)).unwrap();
    let mpd = ws.read("ipgen_foo_v1_00_a/data/ipgen_foo_v2_1_0.mpd");

    let params: Vec<&str> = mpd
        .lines()
        .skip_while(|l| *l != "## User Parameters")
        .skip(1)
        .take_while(|l| l.starts_with("PARAMETER "))
        .collect();
    assert_eq!(
        params,
        [
            "PARAMETER W = 32, DT = integer",
            "PARAMETER NAME = \"foo\", DT = string",
            "PARAMETER INIT = 8'hA5, DT = std_logic_vector",
        ]
    );

    let ports: Vec<&str> = mpd
        .lines()
        .skip_while(|l| *l != "## User Ports")
        .filter(|l| l.starts_with("PORT "))
        .collect();
    assert_eq!(
        ports,
        [
            "PORT CLK = \"\", DIR = I",
            "PORT RST = \"\", DIR = I",
            "PORT din = \"\", DIR = I, VEC = [W-1:0]",
            "PORT led = \"\", DIR = O, VEC = [7:0]",
        ]
    );
}

#[test]
fn axi_package_layout() {
    let ws = Workspace::new(FOO);
    ws.build(&ws.config(InterfaceFamily::Axi)).unwrap();
    let root = ws.out().join("ipgen_foo_v1_00_a");
    for dir in ["data", "doc", "bd", "xgui", "hdl", "hdl/verilog", "test"] {
        assert!(root.join(dir).is_dir(), "missing directory {dir}");
    }
    assert_eq!(
        files_under(&root),
        [
            "bd/bd.tcl",
            "component.xml",
            "data/ipgen_foo.xdc",
            "data/ipgen_foo_v2_1_0.mpd",
            "data/ipgen_foo_v2_1_0.pao",
            "data/ipgen_foo_v2_1_0.tcl",
            "hdl/verilog/ipgen_foo.v",
            "test/Makefile",
            "test/test_ipgen_foo.v",
            "xgui/xgui.tcl",
        ]
    );

    let xml = ws.read("ipgen_foo_v1_00_a/component.xml");
    assert!(xml.contains("dma_AXI"));
    assert!(xml.contains("regs_AXI"));
    assert!(xml.contains("MODELPARAM_VALUE.W"));
    assert_eq!(
        ipxact_names(&xml, "ports", "port"),
        ["CLK", "RST", "din", "led"]
    );
    assert_eq!(
        ipxact_names(&xml, "modelParameters", "modelParameter"),
        ["W", "NAME", "INIT"]
    );
    let makefile = ws.read("ipgen_foo_v1_00_a/test/Makefile");
    assert!(makefile.contains("test_ipgen_foo.v"));
    assert!(makefile.contains("ipgen_foo.v"));
}

#[test]
fn avalon_package_for_foo() {
    let ws = Workspace::new(FOO);
    ws.build(&ws.config(InterfaceFamily::Avalon)).unwrap();
    let root = ws.out().join("ipgen_foo_v1_00_a");
    assert_eq!(
        files_under(&root),
        [
            "hdl/verilog/ipgen_common.v",
            "hdl/verilog/ipgen_foo.tcl",
            "hdl/verilog/ipgen_foo.v",
            "test/Makefile",
            "test/test_ipgen_foo.v",
        ]
    );
    let bench = ws.read("ipgen_foo_v1_00_a/test/test_ipgen_foo.v");
    assert!(bench.contains("module test_ipgen_foo"));
    assert!(bench.contains("module avalon_master_fifo"));
    let tcl = ws.read("ipgen_foo_v1_00_a/hdl/verilog/ipgen_foo.tcl");
    assert!(tcl.contains("STRING"));
    assert!(tcl.contains("Input"));
}

#[rstest]
#[case(InterfaceFamily::Axi)]
#[case(InterfaceFamily::Avalon)]
fn bench_keeps_parameter_values_verbatim(#[case] family: InterfaceFamily) {
    let ws = Workspace::new(
        r#"
module foo #
  (
   parameter [7:0] INIT = {4'h1, 4'h2},
   parameter my_parameter_w = 8
  )
  (
   input wire CLK,
   input wire RST,
   output wire [my_parameter_w-1:0] q
  );

  ipgen_slave_lite_memory regs (.CLK(CLK), .RST(RST));

  assign q = INIT;
endmodule
"#,
    );
    ws.build(&ws.config(family)).unwrap();

    let bench = ws.read("ipgen_foo_v1_00_a/test/test_ipgen_foo.v");
    assert!(bench.contains("  localparam [7:0] INIT = {4'h1, 4'h2};"));
    assert!(bench.contains("  localparam my_parameter_w = 8;"));
    assert!(bench.contains("wire [my_parameter_w-1:0] q;"));
    assert!(!bench.contains("my_localparam_w"));
    assert!(!bench.contains("{4'h1; 4'h2}"));
}

#[rstest]
#[case(InterfaceFamily::Axi)]
#[case(InterfaceFamily::Avalon)]
fn bench_uses_configured_simulation_settings(#[case] family: InterfaceFamily) {
    let ws = Workspace::new(FOO);
    let config = BuildConfig {
        sim_addrwidth: 0,
        hperiod_ulogic: 3,
        hperiod_bus: 7,
        ..ws.config(family)
    };
    ws.build(&config).unwrap();

    let bench = ws.read("ipgen_foo_v1_00_a/test/test_ipgen_foo.v");
    assert!(bench.contains("localparam SIM_ADDR_WIDTH = 0;"));
    assert!(bench.contains("localparam HPERIOD_CLK_ULOGIC = 3;"));
    assert!(bench.contains("localparam HPERIOD_CLK_BUS = 7;"));
}

#[rstest]
#[case(InterfaceFamily::Axi, "hdl/verilog/ipgen_foo.v")]
#[case(InterfaceFamily::Avalon, "hdl/verilog/ipgen_foo.v")]
#[case(InterfaceFamily::Avalon, "hdl/verilog/ipgen_common.v")]
fn resource_cells_are_marked_as_placeholders(
    #[case] family: InterfaceFamily,
    #[case] file: &str,
) {
    let ws = Workspace::new(FOO);
    ws.build(&ws.config(family)).unwrap();
    let text = ws.read(&format!("ipgen_foo_v1_00_a/{file}"));
    if file.ends_with("common.v") {
        assert!(text.contains("// ipgen_master_memory: placeholder resource cell"));
        assert!(text.contains("// ipgen_slave_lite_memory: placeholder resource cell"));
    } else {
        assert!(text.contains("Resource cells in the user logic are placeholders."));
        assert!(text.contains("nets below are not wired to them."));
    }
}

#[rstest]
#[case(InterfaceFamily::Generic)]
#[case(InterfaceFamily::Axi)]
#[case(InterfaceFamily::Avalon)]
fn rerun_is_byte_identical(#[case] family: InterfaceFamily) {
    let ws = Workspace::new(FOO);
    let config = ws.config(family);
    ws.build(&config).unwrap();
    let first: Vec<(String, Vec<u8>)> = files_under(&ws.out())
        .into_iter()
        .map(|f| {
            let bytes = fs::read(ws.out().join(&f)).unwrap();
            (f, bytes)
        })
        .collect();

    ws.build(&config).unwrap();
    for (file, bytes) in &first {
        assert_eq!(&fs::read(ws.out().join(file)).unwrap(), bytes, "{file} changed");
    }
    assert_eq!(files_under(&ws.out()).len(), first.len());
}

#[rstest]
#[case("prog.img", false)]
#[case("prog.bin", true)]
fn memory_image_is_copied(#[case] name: &str, #[case] binary: bool) {
    let ws = Workspace::new(FOO);
    let image = ws.dir.path().join(name);
    fs::write(&image, "deadbeef\n").unwrap();
    let config = BuildConfig {
        memimg: Some(image),
        ..ws.config(InterfaceFamily::Axi)
    };
    ws.build(&config).unwrap();

    assert_eq!(ws.read("ipgen_foo_v1_00_a/test/mem.img"), "deadbeef\n");
    let bench = ws.read("ipgen_foo_v1_00_a/test/test_ipgen_foo.v");
    assert_eq!(bench.contains("load_binary(\"mem.img\")"), binary);
    assert_eq!(bench.contains("$readmemh(\"mem.img\""), !binary);
}

#[test]
fn user_test_code_is_spliced_before_endmodule() {
    let ws = Workspace::new(FOO);
    let usertest = ws.dir.path().join("usertest.v");
    fs::write(&usertest, "initial begin\n  #1000;\n  $finish;\nend\n").unwrap();
    let config = BuildConfig {
        usertest: Some(usertest),
        ..ws.config(InterfaceFamily::Axi)
    };
    ws.build(&config).unwrap();

    let bench = ws.read("ipgen_foo_v1_00_a/test/test_ipgen_foo.v");
    let splice = bench.find("$finish;").unwrap();
    let end = bench[splice..].find("endmodule").unwrap() + splice;
    assert!(end < bench.find("module axi_master_fifo").unwrap());
}

#[test]
fn undefined_modules_abort_unless_skipped() {
    let verilog = FOO.replace(
        "  always @(posedge CLK)",
        "  helper u_helper (.CLK(CLK));\n  always @(posedge CLK)",
    );
    let ws = Workspace::new(&verilog);
    let err = ws.build(&ws.config(InterfaceFamily::Axi)).unwrap_err();
    match err {
        IpgenError::Analysis(AnalysisError::ModulesNotFound(names)) => {
            assert_eq!(names, ["helper"])
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!ws.out().exists());

    let config = BuildConfig {
        skip_not_found: true,
        ..ws.config(InterfaceFamily::Axi)
    };
    ws.build(&config).unwrap();
    assert!(ws.out().join("ipgen_foo_v1_00_a").is_dir());
}

#[test]
fn missing_top_module() {
    let ws = Workspace::new(FOO);
    let request = AnalysisRequest::from_files("bar", &[&ws.source]);
    let renderer = Renderer::builtin().unwrap();
    let err = build(
        &VerilogAnalyzer::default(),
        &request,
        &ws.config(InterfaceFamily::Avalon),
        &renderer,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        IpgenError::Analysis(AnalysisError::TopNotFound(ref name)) if name == "bar"
    ));
}
