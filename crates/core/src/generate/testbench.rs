use super::modules::{extract_module_name, extract_port_declarations, Port, PortDirection};

/// Suffix appended to the unit-under-test name to name its testbench module.
pub const TESTBENCH_MODULE_SUFFIX: &str = "_testbench";

/// Build a minimal testbench for `main_module`.
///
/// Inputs become `reg`s, outputs become `wire`s, the module is instantiated
/// as `uut` with named connections, and an `initial` block zeroes every
/// input, waits 10 time units and finishes the simulation.
pub fn synthesize_testbench(main_module: &str) -> String {
    let module_name = extract_module_name(main_module);
    let inputs = extract_port_declarations(main_module, PortDirection::Input);
    let outputs = extract_port_declarations(main_module, PortDirection::Output);

    let mut testbench = format!("module {module_name}{TESTBENCH_MODULE_SUFFIX};\n\n");

    for input in &inputs {
        testbench.push_str(&declaration("reg", input));
    }
    testbench.push('\n');

    for output in &outputs {
        testbench.push_str(&declaration("wire", output));
    }

    testbench.push_str("\n// Instantiate the Unit Under Test (UUT)\n");
    testbench.push_str(&format!("{module_name} uut (\n"));

    let connections = inputs
        .iter()
        .chain(outputs.iter())
        .map(|port| format!("  .{name}({name})", name = port.name))
        .collect::<Vec<_>>();
    if !connections.is_empty() {
        testbench.push_str(&connections.join(",\n"));
        testbench.push('\n');
    }

    testbench.push_str(");\n\n");
    testbench.push_str("initial begin\n");
    testbench.push_str("  // Initialize inputs\n");
    for input in &inputs {
        testbench.push_str(&format!("  {} = 0;\n", input.name));
    }
    testbench.push_str("\n  // Add test cases here\n");
    testbench.push_str("  #10;\n");
    testbench.push_str("\n  $display(\"Testbench completed\");\n");
    testbench.push_str("  $finish;\n");
    testbench.push_str("end\n\n");
    testbench.push_str("endmodule");

    testbench
}

fn declaration(kind: &str, port: &Port) -> String {
    match &port.width {
        Some(width) => format!("{kind} {width} {};\n", port.name),
        None => format!("{kind} {};\n", port.name),
    }
}
