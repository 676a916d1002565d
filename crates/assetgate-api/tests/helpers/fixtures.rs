//! Generated image fixtures.

use axum_test::multipart::Part;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

fn encode(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let mut buffer = Vec::new();
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([120, 80, 40])))
        .write_to(&mut Cursor::new(&mut buffer), format)
        .expect("Failed to encode fixture");
    buffer
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, ImageFormat::Png)
}

pub fn jpeg(width: u32, height: u32) -> Vec<u8> {
    encode(width, height, ImageFormat::Jpeg)
}

pub fn png_part(name: &str, width: u32, height: u32) -> Part {
    Part::bytes(bytes::Bytes::from(png(width, height)))
        .file_name(name.to_string())
        .mime_type("image/png")
}

pub fn jpeg_part(name: &str, width: u32, height: u32) -> Part {
    Part::bytes(bytes::Bytes::from(jpeg(width, height)))
        .file_name(name.to_string())
        .mime_type("image/jpeg")
}

pub fn text_part(name: &str, body: &'static str) -> Part {
    Part::bytes(bytes::Bytes::from_static(body.as_bytes()))
        .file_name(name.to_string())
        .mime_type("text/plain")
}
