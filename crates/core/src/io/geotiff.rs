//! Native GeoTIFF reading/writing for depth grids
//!
//! Uses the `tiff` crate. Only what the smoothing workflow needs is
//! handled: the first image of the file, pixel scale + tiepoint
//! georeferencing, and the GDAL no-data tag. No CRS, no compression.

use crate::error::{Error, Result};
use crate::raster::{DepthGrid, GeoTransform, DEFAULT_NODATA};
use ndarray::Array2;
use num_traits::NumCast;
use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Read, Seek, Write};
use std::path::{Path, PathBuf};
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::colortype::Gray32Float;
use tiff::encoder::TiffEncoder;
use tiff::tags::Tag;

const MODEL_PIXEL_SCALE: u16 = 33550;
const MODEL_TIEPOINT: u16 = 33922;
const GEO_KEY_DIRECTORY: u16 = 34735;
const GDAL_NODATA: u16 = 42113;

/// Suffix appended to the input stem when no output path is given
pub const OUTPUT_SUFFIX: &str = "_smoothed_surface.tif";

/// Read a depth grid from a GeoTIFF file
pub fn read_geotiff<P: AsRef<Path>>(path: P) -> Result<DepthGrid> {
    let file = File::open(path.as_ref())?;
    decode_geotiff(BufReader::new(file))
}

/// Read a depth grid from an in-memory GeoTIFF
pub fn read_geotiff_from_buffer(data: &[u8]) -> Result<DepthGrid> {
    decode_geotiff(Cursor::new(data))
}

/// Write a depth grid to a GeoTIFF file as 32-bit float
pub fn write_geotiff<P: AsRef<Path>>(grid: &DepthGrid, path: P) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    encode_geotiff(grid, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write a depth grid to an in-memory GeoTIFF
pub fn write_geotiff_to_buffer(grid: &DepthGrid) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    encode_geotiff(grid, Cursor::new(&mut buf))?;
    Ok(buf)
}

/// Default output location: `<dir>/<input stem>_smoothed_surface.tif`
pub fn default_output_path<P: AsRef<Path>>(input: P) -> PathBuf {
    let input = input.as_ref();
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "surface".to_string());
    input.with_file_name(format!("{stem}{OUTPUT_SUFFIX}"))
}

fn tiff_err(context: &str) -> impl Fn(tiff::TiffError) -> Error + '_ {
    move |e| Error::Tiff(format!("{context}: {e}"))
}

fn decode_geotiff<R: Read + Seek>(reader: R) -> Result<DepthGrid> {
    let mut decoder = Decoder::new(reader).map_err(tiff_err("cannot open TIFF"))?;

    let (width, height) = decoder
        .dimensions()
        .map_err(tiff_err("cannot read dimensions"))?;
    let rows = height as usize;
    let cols = width as usize;

    let transform = read_geotransform(&mut decoder).unwrap_or_default();
    let nodata = read_nodata(&mut decoder).unwrap_or(DEFAULT_NODATA);

    let samples = match decoder
        .read_image()
        .map_err(tiff_err("cannot read image data"))?
    {
        DecodingResult::F32(buf) => buf,
        DecodingResult::F64(buf) => cast_samples(&buf),
        DecodingResult::U8(buf) => cast_samples(&buf),
        DecodingResult::U16(buf) => cast_samples(&buf),
        DecodingResult::U32(buf) => cast_samples(&buf),
        DecodingResult::I8(buf) => cast_samples(&buf),
        DecodingResult::I16(buf) => cast_samples(&buf),
        DecodingResult::I32(buf) => cast_samples(&buf),
        _ => {
            return Err(Error::UnsupportedDataType(
                "unsupported TIFF sample format".to_string(),
            ));
        }
    };

    if samples.len() != rows * cols {
        return Err(Error::InvalidDimensions {
            rows,
            cols,
            reason: format!(
                "expected {} single-band samples, got {}",
                rows * cols,
                samples.len()
            ),
        });
    }

    let data = Array2::from_shape_vec((rows, cols), samples)
        .map_err(|e| Error::Other(e.to_string()))?;
    DepthGrid::from_array(data, nodata, transform)
}

fn cast_samples<S: NumCast + Copy>(buf: &[S]) -> Vec<f32> {
    buf.iter()
        .map(|&v| num_traits::cast(v).unwrap_or(f32::NAN))
        .collect()
}

fn read_geotransform<R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<GeoTransform> {
    let scale = decoder
        .get_tag_f64_vec(Tag::from_u16_exhaustive(MODEL_PIXEL_SCALE))
        .ok()?;
    let tiepoint = decoder
        .get_tag_f64_vec(Tag::from_u16_exhaustive(MODEL_TIEPOINT))
        .ok()?;

    if scale.len() < 2 || tiepoint.len() < 6 || scale[0] <= 0.0 || scale[1] <= 0.0 {
        return None;
    }

    // tiepoint: [I, J, K, X, Y, Z], scale: [ScaleX, ScaleY, ScaleZ]
    let origin_x = tiepoint[3] - tiepoint[0] * scale[0];
    let origin_y = tiepoint[4] + tiepoint[1] * scale[1];
    Some(GeoTransform::new(origin_x, origin_y, scale[0], -scale[1]))
}

fn read_nodata<R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<f32> {
    let text = decoder
        .get_tag_ascii_string(Tag::from_u16_exhaustive(GDAL_NODATA))
        .ok()?;
    parse_nodata(&text)
}

fn parse_nodata(text: &str) -> Option<f32> {
    let trimmed = text.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    match trimmed.to_ascii_lowercase().as_str() {
        "nan" => Some(f32::NAN),
        other => other.parse::<f64>().ok().map(|v| v as f32),
    }
}

fn encode_geotiff<W: Write + Seek>(grid: &DepthGrid, writer: W) -> Result<()> {
    let mut encoder = TiffEncoder::new(writer).map_err(tiff_err("cannot create encoder"))?;
    let (rows, cols) = grid.shape();

    let mut image = encoder
        .new_image::<Gray32Float>(cols as u32, rows as u32)
        .map_err(tiff_err("cannot create image"))?;

    let gt = grid.transform();

    let scale = [gt.x_res(), gt.y_res(), 0.0];
    image
        .encoder()
        .write_tag(Tag::from_u16_exhaustive(MODEL_PIXEL_SCALE), &scale[..])
        .map_err(tiff_err("cannot write pixel scale"))?;

    let tiepoint = [0.0, 0.0, 0.0, gt.origin_x, gt.origin_y, 0.0];
    image
        .encoder()
        .write_tag(Tag::from_u16_exhaustive(MODEL_TIEPOINT), &tiepoint[..])
        .map_err(tiff_err("cannot write tiepoint"))?;

    // GTModelTypeGeoKey = Projected, GTRasterTypeGeoKey = PixelIsArea
    let geokeys: [u16; 12] = [1, 1, 0, 2, 1024, 0, 1, 1, 1025, 0, 1, 1];
    image
        .encoder()
        .write_tag(Tag::from_u16_exhaustive(GEO_KEY_DIRECTORY), &geokeys[..])
        .map_err(tiff_err("cannot write geokey directory"))?;

    let nodata = format_nodata(grid.nodata());
    image
        .encoder()
        .write_tag(Tag::from_u16_exhaustive(GDAL_NODATA), nodata.as_str())
        .map_err(tiff_err("cannot write no-data tag"))?;

    image
        .write_data(grid.cells())
        .map_err(tiff_err("cannot write image data"))?;

    Ok(())
}

fn format_nodata(nodata: f32) -> String {
    if nodata.is_nan() {
        "nan".to_string()
    } else {
        nodata.to_string()
    }
}
