use clap::Parser;
use log::info;
use optrace::{
    console::{image_summary, singlet_demo, trace_params, Args},
    error::OptResult,
    nanometer,
    trace::Tracer,
};

fn main() -> OptResult<()> {
    env_logger::init();
    //parse CLI arguments
    let args = Args::parse();
    let params = trace_params(&args)?;

    //build and trace the demo system
    let (system, image) = singlet_demo(nanometer!(args.wavelength))?;
    info!("tracing singlet demo with {} elements", system.len());
    let result = Tracer::with_params(&system, params).trace()?;

    print!("{}", image_summary(&result, image)?);
    Ok(())
}
