extern crate clap;
extern crate failure;
extern crate image;
extern crate mandelview;
extern crate num;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use failure::{err_msg, Error};
use image::png::PNGEncoder;
use image::ColorType;
use mandelview::{render, ColorStop, Coloring, GradientPalette, Kernel, Rgb, Viewport};
use num::Complex;
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn parse_complex(s: &str) -> Option<Complex<f64>> {
    match parse_pair(s, ',') {
        Some((re, im)) => Some(Complex { re, im }),
        None => None,
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

fn validate_float(s: &str, err: &str) -> Result<(), String> {
    match f64::from_str(s) {
        Ok(_) => Ok(()),
        Err(_) => Err(err.to_string()),
    }
}

fn validate_positive_float(s: &str, err: &str) -> Result<(), String> {
    match f64::from_str(s) {
        Ok(v) if v > 0.0 => Ok(()),
        _ => Err(err.to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const CENTER: &str = "center";
const ZOOM: &str = "zoom";
const ROTATION: &str = "rotation";
const ITERATIONS: &str = "iterations";
const THREADS: &str = "threads";
const KERNEL: &str = "kernel";
const COLORING: &str = "coloring";
const PALETTE: &str = "palette";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("mview")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Mandelbrot view renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("800x600")
                .validator(|s| validate_pair::<usize>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(CENTER)
                .required(false)
                .long(CENTER)
                .short("c")
                .takes_value(true)
                .default_value("-0.5,0.0")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse view center"))
                .help("Center of the view on the complex plane"),
        )
        .arg(
            Arg::with_name(ZOOM)
                .required(false)
                .long(ZOOM)
                .short("z")
                .takes_value(true)
                .default_value("1.0")
                .validator(|s| validate_positive_float(&s, "Zoom must be a positive number"))
                .help("Magnification; 1.0 frames the whole set"),
        )
        .arg(
            Arg::with_name(ROTATION)
                .required(false)
                .long(ROTATION)
                .short("r")
                .takes_value(true)
                .default_value("0.0")
                .validator(|s| validate_float(&s, "Could not parse rotation"))
                .help("View rotation in radians"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("1000")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        1_000_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 1000000",
                    )
                })
                .help("Iteration budget per point"),
        )
        .arg(
            Arg::with_name(THREADS)
                .required(false)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .default_value("1")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of worker threads to use in the renderer"),
        )
        .arg(
            Arg::with_name(KERNEL)
                .required(false)
                .long(KERNEL)
                .takes_value(true)
                .default_value("vector")
                .possible_values(&["scalar", "vector"])
                .help("Escape-time kernel"),
        )
        .arg(
            Arg::with_name(COLORING)
                .required(false)
                .long(COLORING)
                .takes_value(true)
                .default_value("smooth")
                .possible_values(&["discrete", "smooth", "adaptive"])
                .help("Coloring policy"),
        )
        .arg(
            Arg::with_name(PALETTE)
                .required(false)
                .long(PALETTE)
                .short("p")
                .takes_value(true)
                .default_value("midnight")
                .possible_values(&["midnight", "fire", "grayscale"])
                .help("Built-in gradient palette"),
        )
        .get_matches()
}

fn stop(position: f64, r: u8, g: u8, b: u8) -> ColorStop {
    ColorStop {
        position,
        color: Rgb(r, g, b),
    }
}

fn preset_palette(name: &str) -> Result<GradientPalette, Error> {
    let stops = match name {
        "midnight" => vec![
            stop(0.0, 0, 8, 100),
            stop(0.16, 33, 107, 204),
            stop(0.42, 237, 255, 255),
            stop(0.64, 255, 171, 0),
            stop(0.86, 2, 2, 0),
            stop(1.0, 0, 8, 100),
        ],
        "fire" => vec![
            stop(0.0, 0, 0, 0),
            stop(0.3, 128, 0, 0),
            stop(0.6, 255, 96, 0),
            stop(0.85, 255, 220, 64),
            stop(1.0, 255, 255, 255),
        ],
        "grayscale" => vec![stop(0.0, 0, 0, 0), stop(1.0, 255, 255, 255)],
        other => return Err(err_msg(format!("Unknown palette: {}", other))),
    };
    GradientPalette::new(stops).map_err(err_msg)
}

fn write_image(outfile: &str, pixels: &[u8], bounds: (usize, usize)) -> Result<(), std::io::Error> {
    let path = Path::new(outfile);
    let output = File::create(&path)?;
    let encoder = PNGEncoder::new(output);
    encoder.encode(pixels, bounds.0 as u32, bounds.1 as u32, ColorType::RGB(8))?;
    Ok(())
}

fn run(matches: &ArgMatches) -> Result<(), Error> {
    let (width, height) = parse_pair::<usize>(matches.value_of(SIZE).unwrap(), 'x')
        .ok_or_else(|| err_msg("Error parsing image dimensions"))?;
    let center = parse_complex(matches.value_of(CENTER).unwrap())
        .ok_or_else(|| err_msg("Error parsing view center"))?;
    let zoom = f64::from_str(matches.value_of(ZOOM).unwrap())?;
    let rotation = f64::from_str(matches.value_of(ROTATION).unwrap())?;
    let max_iterations = u32::from_str(matches.value_of(ITERATIONS).unwrap())?;
    let workers = usize::from_str(matches.value_of(THREADS).unwrap())?;

    let kernel = match matches.value_of(KERNEL).unwrap() {
        "scalar" => Kernel::Scalar,
        _ => Kernel::Vector,
    };
    let coloring = match matches.value_of(COLORING).unwrap() {
        "discrete" => Coloring::Discrete,
        "adaptive" => Coloring::Adaptive,
        _ => Coloring::Smooth,
    };
    let palette = preset_palette(matches.value_of(PALETTE).unwrap())?;

    let view = Viewport {
        center,
        zoom,
        rotation,
        max_iterations,
    };
    let mut buffer = vec![0u8; width * height * 3];
    render(&view, width, height, kernel, coloring, &palette, workers, &mut buffer);
    write_image(matches.value_of(OUTPUT).unwrap(), &buffer, (width, height))?;
    Ok(())
}

fn main() {
    let matches = args();
    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
