//! refinenb binary entry point.

use refinenb::{cli, ui::output};

fn main() {
    if let Err(e) = cli::run() {
        output::error(format!("{:#}", e));
        std::process::exit(1);
    }
}
