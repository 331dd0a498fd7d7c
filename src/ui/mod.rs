pub mod console;
pub mod renderer;

pub use console::ConsoleView;
