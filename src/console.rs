//! Handling the optrace CLI
//!
//! This module handles the command line parsing and provides the built-in demo system traced by the `optrace`
//! binary: a biconvex N-BK7 singlet lens imaging a collimated beam onto a flat image plane.
use crate::{
    curve::{Flat, Sphere},
    distribution::{Distribution, Pattern},
    error::{OptError, OptResult},
    material::{MaterialRef, Solid},
    meter, millimeter, nanometer,
    nodes::{Element, ElementId, Image, OpticalSurface, Source, SpectralLine, Stop},
    shape::Disk,
    system::System,
    trace::{IntensityMode, TraceMode, TraceParams, TraceResult},
    utils::geom_transformation::Transform,
};
use clap::Parser;
use std::{fs, path::PathBuf, sync::Arc};
use uom::si::{f64::Length, length::millimeter};

/// Command line arguments for the optrace application.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// trace mode (`Sequential` or `NonSequential`)
    #[arg(short, long)]
    pub mode: Option<TraceMode>,

    /// interaction rules at surfaces (`Simple`, `Intensity` or `Polarized`)
    #[arg(short, long)]
    pub intensity: Option<IntensityMode>,

    /// ray distribution pattern on the entrance pupil
    #[arg(short, long)]
    pub pattern: Option<Pattern>,

    /// radial density (number of rings) of the ray distribution
    #[arg(short, long)]
    pub rings: Option<usize>,

    /// wavelength of the source in nm
    #[arg(short, long, default_value_t = 587.56)]
    pub wavelength: f64,

    /// YAML file with trace parameters. Values given on the command line take precedence.
    #[arg(long)]
    pub params: Option<PathBuf>,
}

/// Assemble the [`TraceParams`] from the command line arguments.
///
/// # Errors
///
/// This function will return an error if the parameter file cannot be read or parsed or if the ray distribution is
/// invalid.
pub fn trace_params(args: &Args) -> OptResult<TraceParams> {
    let mut params = match &args.params {
        Some(path) => {
            let yaml = fs::read_to_string(path).map_err(|e| {
                OptError::Config(format!("cannot read file {} : {e}", path.display()))
            })?;
            TraceParams::from_yaml(&yaml)?
        }
        None => TraceParams::default(),
    };
    if let Some(mode) = args.mode {
        params.set_mode(mode);
    }
    if let Some(intensity_mode) = args.intensity {
        params.set_intensity_mode(intensity_mode);
    }
    if args.pattern.is_some() || args.rings.is_some() {
        let current = params.default_distribution();
        let distribution = Distribution::new(
            args.pattern.unwrap_or_else(|| current.pattern()),
            args.rings.unwrap_or_else(|| current.radial_density()),
        )?;
        params.set_default_distribution(distribution);
    }
    Ok(params)
}

/// Build the singlet lens demo system for the given wavelength.
///
/// The system consists of a collimated source, an aperture stop (radius 10 mm), a biconvex N-BK7 lens (radii of
/// curvature ±100 mm, center thickness 6 mm) and an image plane at the paraxial focus. Returns the system and the id
/// of the image plane.
///
/// # Errors
///
/// This function will return an error if the wavelength is not positive or not finite.
pub fn singlet_demo(wavelength: Length) -> OptResult<(System, ElementId)> {
    let mut system = System::new();
    system.set_environment(Arc::new(Solid::air()));
    let air: MaterialRef = Arc::new(Solid::air());
    let glass: MaterialRef = Arc::new(Solid::default());
    let lens_aperture = Arc::new(Disk::new(millimeter!(15.0))?);

    let source =
        Source::default().with_spectrum(vec![SpectralLine::new(wavelength, 1.0)?])?;
    system.add(Element::new("collimated beam", source));
    system.add(
        Element::new("aperture stop", Stop::new(Arc::new(Disk::new(millimeter!(10.0))?)))
            .with_transform(Transform::new_along_z(millimeter!(10.0))?),
    );
    let lens = system.add(
        Element::group("singlet").with_transform(Transform::new_along_z(millimeter!(20.0))?),
    );
    let front = OpticalSurface::new(
        Arc::new(Sphere::new(millimeter!(100.0))?),
        lens_aperture.clone(),
        air.clone(),
        glass.clone(),
    );
    let back = OpticalSurface::new(
        Arc::new(Sphere::new(millimeter!(-100.0))?),
        lens_aperture,
        glass,
        air,
    );
    system.add_to(lens, Element::new("front surface", front))?;
    system.add_to(
        lens,
        Element::new("back surface", back)
            .with_transform(Transform::new_along_z(millimeter!(6.0))?),
    )?;
    let image = system.add(
        Element::new(
            "image plane",
            Image::new(Arc::new(Flat), Arc::new(Disk::new(millimeter!(20.0))?)),
        )
        .with_transform(Transform::new_along_z(millimeter!(121.7))?),
    );
    Ok((system, image))
}

/// Default wavelength of the demo source.
#[must_use]
pub fn default_wavelength() -> Length {
    nanometer!(587.56)
}

/// Create a short textual report of the intercepts on the given image element.
///
/// # Errors
///
/// This function will return an error if the intercepted rays of the element have not been saved.
pub fn image_summary(result: &TraceResult, image: ElementId) -> OptResult<String> {
    let mut summary = format!(
        "rays traced: {} (lost: {}, bounce limit reached: {})\nrays on image: {}\n",
        result.rays().len(),
        result.lost_count(),
        result.bounce_limit_count(),
        result.intercepted(image)?.len()
    );
    let (Some(centroid), Some((min, max))) = (
        result.intercepted_centroid(image)?,
        result.intercepted_window(image)?,
    ) else {
        summary.push_str("no rays hit the image\n");
        return Ok(summary);
    };
    let mm = |v: f64| meter!(v).get::<millimeter>();
    summary.push_str(&format!(
        "centroid: ({:.6}, {:.6}) mm\nspot size: {:.6} x {:.6} mm\n",
        mm(centroid.x),
        mm(centroid.y),
        mm(max.x - min.x),
        mm(max.y - min.y)
    ));
    Ok(summary)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::trace::Tracer;
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;

    fn args(cli: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("optrace").chain(cli.iter().copied())).unwrap()
    }
    #[test]
    fn parse_args() {
        let a = args(&[]);
        assert_eq!(a.mode, None);
        assert_abs_diff_eq!(a.wavelength, 587.56);
        let a = args(&["-m", "Sequential", "-p", "Cross", "-r", "3", "-i", "Polarized"]);
        assert_eq!(a.mode, Some(TraceMode::Sequential));
        assert_eq!(a.pattern, Some(Pattern::Cross));
        assert_eq!(a.rings, Some(3));
        assert_eq!(a.intensity, Some(IntensityMode::Polarized));
        assert!(Args::try_parse_from(["optrace", "-m", "Zigzag"]).is_err());
    }
    #[test]
    fn params_from_args() {
        let params = trace_params(&args(&[])).unwrap();
        assert_eq!(params, TraceParams::default());
        let params = trace_params(&args(&["-m", "Sequential", "-r", "2"])).unwrap();
        assert_eq!(params.mode(), TraceMode::Sequential);
        assert_eq!(params.default_distribution().pattern(), Pattern::HexaPolar);
        assert_eq!(params.default_distribution().radial_density(), 2);
        assert_matches!(trace_params(&args(&["-r", "0"])), Err(OptError::Config(_)));
        assert_matches!(
            trace_params(&args(&["--params", "/non/existing/params.yaml"])),
            Err(OptError::Config(_))
        );
    }
    #[test]
    fn demo_focus() {
        let (system, image) = singlet_demo(default_wavelength()).unwrap();
        assert_eq!(system.len(), 6);
        for mode in [TraceMode::Sequential, TraceMode::NonSequential] {
            let mut params = TraceParams::default();
            params.set_mode(mode);
            params.set_default_distribution(Distribution::new(Pattern::HexaPolar, 3).unwrap());
            let result = Tracer::with_params(&system, params).trace().unwrap();
            assert_eq!(result.intercepted(image).unwrap().len(), 37);
            let centroid = result.intercepted_centroid(image).unwrap().unwrap();
            assert_abs_diff_eq!(centroid.x, 0.0, epsilon = 1e-9);
            assert_abs_diff_eq!(centroid.y, 0.0, epsilon = 1e-9);
            let (min, max) = result.intercepted_window(image).unwrap().unwrap();
            assert!(max.y - min.y < meter!(1e-3).value);
        }
        assert!(singlet_demo(nanometer!(-1.0)).is_err());
    }
    #[test]
    fn summary() {
        let (system, image) = singlet_demo(default_wavelength()).unwrap();
        let result = Tracer::new(&system).trace().unwrap();
        let text = image_summary(&result, image).unwrap();
        assert!(text.contains("rays on image: 91"));
        assert!(text.contains("centroid: "));
        assert_matches!(image_summary(&result, ElementId(0)), Err(OptError::Trace(_)));
    }
}
