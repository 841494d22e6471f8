use clap::{Command, arg};

pub const ANALYZE_CMD: &str = "analyze";

pub fn create_analyze_cli() -> Command {
    Command::new(ANALYZE_CMD)
        .about("Analyze a VCF file and print the drug-gene risk report as JSON.")
        .arg_required_else_help(true)
        .arg(arg!(--vcf <vcf> "The VCF file to analyze, plain or gzip compressed").required(true))
        .arg(arg!(--drugs <drugs> "Comma separated drugs to evaluate (default: every drug in the catalog)"))
        .arg(arg!(--catalog <catalog> "Catalog file (.toml, .yaml), replaces the embedded catalog"))
        .arg(arg!(--config <config> "Pipeline config file (.toml, .yaml)"))
        .arg(arg!(--"subject-id" <subject_id> "Subject id of the report (default: the VCF sample id)"))
        .arg(arg!(-o --output <output> "Write the report here instead of stdout"))
        .arg(arg!(--"llm-endpoint" <llm_endpoint> "OpenAI-compatible chat completions endpoint for narratives"))
        .arg(arg!(--"llm-model" <llm_model> "Model name sent to the narrative endpoint"))
        .arg(
            arg!(--"timeout-ms" <timeout_ms> "Deadline of each narrative request in milliseconds")
                .value_parser(clap::value_parser!(u64)),
        )
}
