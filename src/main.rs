//! # pixel-dupes CLI
//!
//! Command-line interface for the pixel duplicate finder.
//!
//! ## Usage
//! ```bash
//! pixel-dupes hash ~/Photos -R
//! pixel-dupes compare ImageHashes-0.txt --output json
//! ```

mod cli;

use pixel_dupes::Result;

fn main() -> Result<()> {
    pixel_dupes::init_tracing();
    cli::run()
}
