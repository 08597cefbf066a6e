mod args;

pub use args::{CliArgs, Command, CompressionLevel, FontArgs, ImageArgs, InspectArgs, OutputArgs};
