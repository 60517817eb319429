use seamscale::{
    carve_seams, draw_seam, energy_to_image, restore_coordinates, CarveConfig, Direction, Rect,
    ResizeSession, SeamFinder,
};
use std::error::Error;

extern crate clap;
extern crate image;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use image::{Rgb, RgbImage};
use log::info;

type CliResult<T> = Result<T, Box<dyn Error>>;

fn input_output(command: Command) -> Command {
    command
        .arg(
            Arg::new("input")
                .help("The image to read")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("output")
                .help("Where to write the result; the extension picks the format")
                .required(true)
                .index(2),
        )
}

fn split_arg() -> Arg {
    Arg::new("split")
        .long("split")
        .help("Share of new columns made by the first duplication pass")
        .value_parser(value_parser!(f64))
}

fn load(matches: &ArgMatches) -> CliResult<RgbImage> {
    let path = matches.get_one::<String>("input").ok_or("no input image")?;
    Ok(image::open(path)?.to_rgb8())
}

fn save(matches: &ArgMatches, image: &RgbImage) -> CliResult<()> {
    let path = matches.get_one::<String>("output").ok_or("no output path")?;
    image.save(path)?;
    info!("wrote {}x{} to {}", image.width(), image.height(), path);
    Ok(())
}

fn config(matches: &ArgMatches) -> CliResult<CarveConfig> {
    let mut config = CarveConfig::default();
    if let Some(split) = matches.get_one::<f64>("split") {
        config.enlarge_split = *split;
    }
    if let Some(build) = matches.try_get_one::<f64>("build-scale").ok().flatten() {
        config.build_scale = *build;
    }
    config.validate()?;
    Ok(config)
}

fn energy(matches: &ArgMatches) -> CliResult<()> {
    let image = load(matches)?;
    let energy = seamscale::calculate_energy(&image)?;
    let out = energy_to_image(&energy);
    let path = matches.get_one::<String>("output").ok_or("no output path")?;
    out.save(path)?;
    Ok(())
}

fn seams(matches: &ArgMatches) -> CliResult<()> {
    let image = load(matches)?;
    let count = matches.get_one::<u32>("count").copied().unwrap_or(1);
    let (width, height) = image.dimensions();
    let mut drawn = image.clone();
    if matches.get_flag("horizontal") {
        let seam = seamscale::GradientSeams::new(&image).find_horizontal_seam()?;
        let flipped = seamscale::flipper::transpose_image(&drawn);
        drawn = seamscale::flipper::transpose_image(&draw_seam(&flipped, &seam, Rgb([255, 0, 0]))?);
    } else {
        let (batch, _) = carve_seams(&image, count)?;
        for seam in restore_coordinates(&batch, width, height)? {
            drawn = draw_seam(&drawn, &seam, Rgb([255, 0, 0]))?;
        }
    }
    save(matches, &drawn)
}

fn scale(matches: &ArgMatches) -> CliResult<()> {
    let image = load(matches)?;
    let config = config(matches)?;
    let scale = matches.get_one::<f64>("scale").copied().ok_or("no scale given")?;
    let direction = if matches.get_flag("vertical") {
        Direction::Vertical
    } else {
        Direction::Horizontal
    };
    let mut session = ResizeSession::with_config(image, config)?;
    session.build_default(direction)?;
    let out = session.scale(direction, scale)?;
    save(matches, &out)
}

fn remove(matches: &ArgMatches) -> CliResult<()> {
    let image = load(matches)?;
    let config = config(matches)?;
    let corners: Vec<u32> = matches
        .get_many::<u32>("rect")
        .ok_or("no rectangle given")?
        .copied()
        .collect();
    let rect = match corners[..] {
        [x1, x2, y1, y2] => Rect::new(x1, x2, y1, y2),
        _ => return Err("a rectangle takes four values: X1 X2 Y1 Y2".into()),
    };
    let session = ResizeSession::with_config(image, config)?;
    let out = session.remove_object(rect)?;
    save(matches, &out)
}

fn run() -> CliResult<()> {
    let matches = Command::new("seamscale")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Content-aware resizing and object removal by seam carving")
        .subcommand_required(true)
        .subcommand(input_output(
            Command::new("energy").about("Write the energy map of an image as grayscale"),
        ))
        .subcommand(
            input_output(Command::new("seams").about("Paint the cheapest seams onto an image"))
                .arg(
                    Arg::new("count")
                        .long("count")
                        .short('n')
                        .help("How many vertical seams to paint")
                        .value_parser(value_parser!(u32)),
                )
                .arg(
                    Arg::new("horizontal")
                        .long("horizontal")
                        .help("Paint the single cheapest horizontal seam instead")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            input_output(Command::new("scale").about("Resize an image along one axis"))
                .arg(
                    Arg::new("scale")
                        .long("scale")
                        .short('s')
                        .help("Target size as a multiple of the original")
                        .required(true)
                        .value_parser(value_parser!(f64)),
                )
                .arg(
                    Arg::new("build-scale")
                        .long("build-scale")
                        .help("Share of the image to precompute seams for, in (0, 1)")
                        .value_parser(value_parser!(f64)),
                )
                .arg(
                    Arg::new("vertical")
                        .long("vertical")
                        .help("Change the height rather than the width")
                        .action(ArgAction::SetTrue),
                )
                .arg(split_arg()),
        )
        .subcommand(
            input_output(Command::new("remove").about("Erase a rectangle and refill the image"))
                .arg(
                    Arg::new("rect")
                        .long("rect")
                        .help("Inclusive corners of the rectangle to erase")
                        .required(true)
                        .num_args(4)
                        .value_names(["X1", "X2", "Y1", "Y2"])
                        .value_parser(value_parser!(u32)),
                )
                .arg(split_arg()),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("energy", sub)) => energy(sub),
        Some(("seams", sub)) => seams(sub),
        Some(("scale", sub)) => scale(sub),
        Some(("remove", sub)) => remove(sub),
        _ => Err("unknown subcommand".into()),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(err) = run() {
        eprintln!("seamscale: {}", err);
        std::process::exit(1);
    }
}
