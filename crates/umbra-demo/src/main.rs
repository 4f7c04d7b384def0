mod config;
mod demo;
mod panel;
mod scene;
mod shaders;

use anyhow::Result;
use winit::dpi::LogicalSize;

use umbra_engine::device::GpuInit;
use umbra_engine::logging::{init_logging, LoggingConfig};
use umbra_engine::window::{Runtime, RuntimeConfig};

use crate::config::DemoConfig;
use crate::demo::Demo;

fn main() -> Result<()> {
    // `--default-depth` starts with the renderer's own shadow depth program.
    let custom_depth = !std::env::args().any(|a| a == "--default-depth");
    let config = DemoConfig::default().use_custom_depth_material(custom_depth);
    init_logging(LoggingConfig::with_filter(config.log_filter.clone()));

    let demo = Demo::new(config.clone())?;
    log::info!("{}  (click the top-right box or press C to toggle, Esc to quit)", demo.title());

    let (w, h) = config.window_size;
    Runtime::run(
        RuntimeConfig { title: demo.title(), initial_size: LogicalSize::new(w, h) },
        GpuInit::default(),
        demo,
    )
}
