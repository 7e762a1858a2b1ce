use anyhow::Result;

use cg3d_chapters::basics::hello_index::{self, HelloIndex};
use cg3d_chapters::cli;
use cg3d_engine::device::GpuInit;
use cg3d_engine::logging::{init_logging, LoggingConfig};
use cg3d_engine::window::Runtime;

fn main() -> Result<()> {
    let args = cli::parse();

    let mut logging = LoggingConfig::default();
    if let Some(filter) = &args.log_filter {
        logging = logging.with_filter(filter.clone());
    }
    init_logging(logging);

    let config = args.hello_index_config();
    log::info!("{}: texture '{}'", hello_index::TITLE, config.texture_path.display());

    Runtime::run(hello_index::runtime_config(), GpuInit::default(), HelloIndex::new(config))
}
