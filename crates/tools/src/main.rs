use std::env;
use std::fs;
use std::path::PathBuf;

use formats::country::CountrySet;
use formats::raster::CountryIdRaster;
use scene::picking::CpuPicker;
use serde::Serialize;

const DEFAULT_WIDTH: u32 = 1024;
const DEFAULT_HEIGHT: u32 = 512;
const RASTER_FILE_NAME: &str = "countries.cir";
const INDEX_FILE_NAME: &str = "country-index.json";
const REPORT_FILE_NAME: &str = "raster-report.json";

fn main() {
    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let mut args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(usage());
    }

    let cmd = args[1].clone();
    args.drain(0..2);

    match cmd.as_str() {
        "raster" => cmd_raster(args),
        "inspect" => cmd_inspect(args),
        _ => Err(usage()),
    }
}

#[derive(Debug, Serialize)]
struct RasterReport {
    width: u32,
    height: u32,
    dataset_hash: String,
    countries: usize,
    land_pixels: usize,
    total_pixels: usize,
}

fn cmd_raster(args: Vec<String>) -> Result<(), String> {
    // globe-assets raster <topology.json> <object> <out_dir> [--width N] [--height N]
    if args.len() < 3 {
        return Err(usage());
    }

    let topology_path = PathBuf::from(&args[0]);
    let object = args[1].clone();
    let out_dir = PathBuf::from(&args[2]);
    let mut width = DEFAULT_WIDTH;
    let mut height = DEFAULT_HEIGHT;

    let mut i = 3;
    while i < args.len() {
        match args[i].as_str() {
            "--width" => {
                i += 1;
                width = parse_dim(&args, i, "--width")?;
            }
            "--height" => {
                i += 1;
                height = parse_dim(&args, i, "--height")?;
            }
            s => {
                return Err(format!("unknown arg: {s}\n\n{}", usage()));
            }
        }
        i += 1;
    }

    let payload = fs::read_to_string(&topology_path)
        .map_err(|e| format!("read {topology_path:?}: {e}"))?;
    let countries = CountrySet::from_topojson_str(&payload, &object)
        .map_err(|e| format!("load topology: {e}"))?;
    let dataset_hash = *blake3::hash(payload.as_bytes()).as_bytes();

    let picker = CpuPicker::new(&countries);
    let mut ids: Vec<u16> = Vec::with_capacity(width as usize * height as usize);
    let mut land_pixels = 0usize;

    // Equirectangular scan, sampling each pixel at its center.
    for y in 0..height {
        let lat = 90.0 - (y as f64 + 0.5) * 180.0 / height as f64;
        for x in 0..width {
            let lng = -180.0 + (x as f64 + 0.5) * 360.0 / width as f64;
            let id = picker.pick(&countries, lat, lng).unwrap_or(0);
            if id != 0 {
                land_pixels += 1;
            }
            ids.push(id);
        }
    }

    let raster = CountryIdRaster::new(width, height, dataset_hash, ids)
        .map_err(|e| format!("assemble raster: {e}"))?;

    fs::create_dir_all(&out_dir).map_err(|e| format!("create {out_dir:?}: {e}"))?;

    let raster_path = out_dir.join(RASTER_FILE_NAME);
    fs::write(&raster_path, raster.encode())
        .map_err(|e| format!("write {raster_path:?}: {e}"))?;

    let index_path = out_dir.join(INDEX_FILE_NAME);
    let index = serde_json::to_string_pretty(&countries.index_entries())
        .map_err(|e| format!("json: {e}"))?;
    fs::write(&index_path, index).map_err(|e| format!("write {index_path:?}: {e}"))?;

    let report = RasterReport {
        width,
        height,
        dataset_hash: raster.dataset_hash_hex(),
        countries: countries.features().len(),
        land_pixels,
        total_pixels: width as usize * height as usize,
    };
    let report_path = out_dir.join(REPORT_FILE_NAME);
    let payload = serde_json::to_string_pretty(&report).map_err(|e| format!("json: {e}"))?;
    fs::write(&report_path, payload).map_err(|e| format!("write {report_path:?}: {e}"))?;

    println!(
        "wrote {}x{} raster, {} countries, {}/{} land pixels",
        report.width, report.height, report.countries, report.land_pixels, report.total_pixels
    );
    Ok(())
}

fn cmd_inspect(args: Vec<String>) -> Result<(), String> {
    // globe-assets inspect <countries.cir>
    if args.len() != 1 {
        return Err(usage());
    }

    let path = PathBuf::from(&args[0]);
    let bytes = fs::read(&path).map_err(|e| format!("read {path:?}: {e}"))?;
    let raster = CountryIdRaster::decode(&bytes).map_err(|e| format!("decode: {e}"))?;

    let mut land = 0usize;
    let mut max_id = 0u16;
    for y in 0..raster.height() {
        for x in 0..raster.width() {
            let id = raster.id_at_pixel(x, y);
            if id != 0 {
                land += 1;
                max_id = max_id.max(id);
            }
        }
    }

    println!("{}x{} country-id raster", raster.width(), raster.height());
    println!("dataset {}", raster.dataset_hash_hex());
    println!(
        "{} land pixels of {} ({:.1}%), highest id {}",
        land,
        raster.width() as usize * raster.height() as usize,
        100.0 * land as f64 / (raster.width() as usize * raster.height() as usize) as f64,
        max_id
    );
    Ok(())
}

fn parse_dim(args: &[String], i: usize, flag: &str) -> Result<u32, String> {
    let value = args
        .get(i)
        .ok_or_else(|| format!("{flag} requires a value"))?;
    let parsed: u32 = value
        .parse()
        .map_err(|_| format!("{flag}: not a number: {value}"))?;
    if parsed == 0 {
        return Err(format!("{flag} must be positive"));
    }
    Ok(parsed)
}

fn usage() -> String {
    [
        "globe-assets <command>",
        "",
        "commands:",
        "  raster <topology.json> <object> <out_dir> [--width N] [--height N]",
        "      bake a country-id raster (countries.cir), the country index",
        "      (country-index.json) and a bake report from a TopoJSON file",
        "  inspect <countries.cir>",
        "      print raster dimensions, dataset hash and land coverage",
    ]
    .join("\n")
}
