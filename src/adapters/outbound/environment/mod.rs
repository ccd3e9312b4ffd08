/// Environment adapters probing the host for external tools
mod path_tool_locator;

pub use path_tool_locator::PathToolLocator;
