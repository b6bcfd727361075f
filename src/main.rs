use std::{env, error::Error, path::Path, process};

use ticketscan::{extract_plays, TemplateSet};

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let mut args = env::args().skip(1);
    let (Some(image_path), Some(template_dir)) = (args.next(), args.next()) else {
        eprintln!("usage: ticketscan <ticket-image> <template-dir>");
        process::exit(2);
    };

    let frame = image::open(&image_path)?;
    let templates = TemplateSet::load_dir(Path::new(&template_dir))?;

    let plays = extract_plays(&frame, &templates, None)?;
    if plays.is_empty() {
        println!("no plays recovered");
    } else {
        for play in &plays {
            println!("{play}");
        }
    }

    Ok(())
}
