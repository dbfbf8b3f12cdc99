extern crate clap;
extern crate crossbeam;
extern crate env_logger;
extern crate image;
extern crate mandel;
extern crate num;

use clap::{App, Arg, ArgMatches};
use image::{Rgb, RgbImage};
use mandel::escape;
use mandel::{Region, Session};
use num::Complex;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

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

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const UPPERLEFT: &str = "upperleft";
const LOWERRIGHT: &str = "lowerright";
const ITERATIONS: &str = "iterations";

fn args<'a>() -> ArgMatches<'a> {
    App::new("mandel")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Adaptive Mandelbrot renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output image file"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("768x768")
                .validator(|s| validate_pair::<u32>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(UPPERLEFT)
                .required(false)
                .long(UPPERLEFT)
                .short("u")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-2.1,2.1")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse upper left corner"))
                .help("Upper left corner of the plane rectangle"),
        )
        .arg(
            Arg::with_name(LOWERRIGHT)
                .required(false)
                .long(LOWERRIGHT)
                .short("r")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("2.1,-2.1")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse lower right corner"))
                .help("Lower right corner of the plane rectangle"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("256")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        1_000_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 1000000",
                    )
                })
                .help("Escape iteration limit"),
        )
        .get_matches()
}

/// Paint one delivered region from the session grid into the image.
fn paint_region(img: &mut RgbImage, session: &Session, region: &Region) {
    let r = region.rect;
    for j in 0..r.height {
        for i in 0..r.width {
            if let Some(color) = session.pixel_color(r.x + i, r.y + j) {
                let (red, green, blue) = escape::channels(color);
                img.put_pixel(r.x + i, r.y + j, Rgb([red, green, blue]));
            }
        }
    }
}

/// Repaint everything the session has committed so far.  The fallback
/// when a drain is interrupted, and the final sweep after the render
/// finishes.
fn repaint_all(img: &mut RgbImage, session: &Session) {
    for y in 0..session.height() {
        for x in 0..session.width() {
            if let Some(color) = session.pixel_color(x, y) {
                let (red, green, blue) = escape::channels(color);
                img.put_pixel(x, y, Rgb([red, green, blue]));
            }
        }
    }
}

fn main() {
    env_logger::init();

    let matches = args();
    let (width, height) = parse_pair(matches.value_of(SIZE).unwrap(), 'x')
        .expect("Error parsing image dimensions");
    let upper_left = parse_complex(matches.value_of(UPPERLEFT).unwrap())
        .expect("Error parsing upper left point");
    let lower_right = parse_complex(matches.value_of(LOWERRIGHT).unwrap())
        .expect("Error parsing lower right point");
    let limit = u32::from_str(matches.value_of(ITERATIONS).unwrap())
        .expect("Error parsing iteration count");

    let session = match Session::new(width, height, limit) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("Configuration failure: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = session.initialize(upper_left, lower_right) {
        eprintln!("Initialization failure: {}", e);
        std::process::exit(1);
    }

    let started = Instant::now();
    let mut img = RgbImage::new(width, height);
    let mut delivered = 0usize;
    let done = AtomicBool::new(false);

    // One renderer thread; this thread plays the display consumer,
    // draining on a fixed cadence and painting outside the lock.
    crossbeam::scope(|spawner| {
        let session = &session;
        let done = &done;
        spawner.spawn(move |_| {
            if let Err(e) = session.render() {
                eprintln!("Render failure: {}", e);
            }
            done.store(true, Ordering::SeqCst);
        });

        loop {
            let finished = done.load(Ordering::SeqCst);
            match session.drain_and_swap() {
                Ok(batch) => {
                    delivered += batch.len();
                    for region in &batch {
                        paint_region(&mut img, session, region);
                    }
                    session.retire(batch);
                }
                Err(_) => {
                    // interrupted hand-off: show everything we have
                    repaint_all(&mut img, session);
                }
            }
            if finished {
                break;
            }
            thread::sleep(Duration::from_millis(16));
        }
    })
    .expect("renderer thread panicked");

    // Final sweep, as the original redraws every point once the
    // recursion ends.
    repaint_all(&mut img, &session);

    println!(
        "{}x{} at limit {}: {} regions in {:.2?}",
        width,
        height,
        limit,
        delivered,
        started.elapsed()
    );

    if let Err(e) = img.save(matches.value_of(OUTPUT).unwrap()) {
        eprintln!("Write failure: {}", e);
        std::process::exit(1);
    }
}
