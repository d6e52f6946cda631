use crate::CLAP_STYLING;
use clap::arg;

pub const DEFAULT_SEED_URL: &str = "https://example.com";
pub const DEFAULT_DEPTH: &str = "2";
pub const DEFAULT_MAX_LINKS: &str = "10";
pub const DEFAULT_OUTPUT: &str = "pages";

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("pagewalk")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("pagewalk")
        .about("Fetch a page, follow its links to a bounded depth and save every page it reaches")
        .styles(CLAP_STYLING)
        .arg(
            arg!([SEED_URL])
                .help("The page to start from")
                .default_value(DEFAULT_SEED_URL),
        )
        .arg(
            arg!([DEPTH])
                .help("How many levels of pages to fetch (1 = only the seed)")
                .value_parser(clap::value_parser!(u32))
                .default_value(DEFAULT_DEPTH),
        )
        .arg(
            arg!([MAX_LINKS])
                .help("Maximum number of links followed from each page")
                .value_parser(clap::value_parser!(usize))
                .default_value(DEFAULT_MAX_LINKS),
        )
        .arg(
            arg!([OUTPUT])
                .help("Directory the pages are written to")
                .default_value(DEFAULT_OUTPUT),
        )
        .arg(arg!(-q --"quiet" "Only print failures and the final summary").required(false))
        .arg(
            arg!(--"timeout" <SECONDS>)
                .required(false)
                .help("Request timeout in seconds")
                .value_parser(clap::value_parser!(u64).range(1..))
                .default_value("10"),
        )
        .arg(
            arg!(-c --"concurrency" <NUM>)
                .required(false)
                .help("Sibling links fetched at once (1 keeps strict depth-first order)")
                .value_parser(clap::value_parser!(usize))
                .default_value("1"),
        )
        .arg(
            arg!(--"json")
                .required(false)
                .help("Print the run summary as JSON")
                .action(clap::ArgAction::SetTrue),
        )
}
