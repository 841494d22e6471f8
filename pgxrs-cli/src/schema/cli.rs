use clap::{Command, arg};

pub const SCHEMA_CMD: &str = "schema";

pub fn create_schema_cli() -> Command {
    Command::new(SCHEMA_CMD)
        .about("Print the JSON Schema of the report.")
        .arg(arg!(-o --output <output> "Write the schema here instead of stdout"))
}
