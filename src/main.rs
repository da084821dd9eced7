//! Contact merge CLI
//!
//! Merges the rows of a contact export that share the same `Name`.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- contacts.csv merged.csv
//! cargo run -- --policy reject-ambiguous contacts.csv merged.csv
//! cargo run -- --dialect rfc4180 --extra-fields truncate contacts.csv merged.csv
//! ```
//!
//! Conflicts and other warnings go to stderr. Set `CONTACT_MERGE_LOG` or pass
//! `-v` for more detail.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing file, no `Name` column, unwritable output, etc.)

use contact_merge::{cli, logging, pipeline};
use std::process;

fn main() {
    let args = cli::parse_args();
    logging::init_tracing(args.verbose);

    let config = args.to_merge_config();
    if let Err(e) = pipeline::run(&args.source, &args.output, &config) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
