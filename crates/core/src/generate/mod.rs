//! Interpretation of model responses into Verilog source files.
//!
//! - [`sanitize`]: HTML and escape-sequence cleanup of source text
//! - [`naming`]: canonical and collision-free file names
//! - [`modules`]: `module ... endmodule` block and port scanning
//! - [`testbench`]: testbench synthesis for a single module
//! - [`interpret`]: the JSON-first, module-fallback response interpreter
//! - [`prompt`] and [`report`]: what goes to the model and back to the user

pub mod interpret;
pub mod modules;
pub mod naming;
pub mod prompt;
pub mod report;
pub mod sanitize;
pub mod testbench;
pub mod types;

pub use interpret::{interpret, interpret_with};
pub use modules::{
    extract_module_name, extract_modules, extract_port_declarations, extract_ports, Port,
    PortDirection,
};
pub use naming::{
    canonicalize, derive_base_name, make_unique, make_unique_pair, normalize_file_name,
};
pub use prompt::{build_prompt, SYSTEM_PREAMBLE};
pub use report::{render_error, render_message};
pub use sanitize::sanitize;
pub use testbench::synthesize_testbench;
pub use types::{DebugInfo, GeneratedFile, GenerationRequest, GenerationResult, InterpretOptions};
