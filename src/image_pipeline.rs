//! Validates picked scans and turns them into preview image handles.

use dicom::object::{open_file, DefaultDicomObject};
use dicom::pixeldata::{DecodedPixelData, PhotometricInterpretation, PixelDecoder};
use iced::widget::image::Handle;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::model::{FileKind, StagedFile};

pub const MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

pub const RASTER_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];
pub const DICOM_EXTENSIONS: [&str; 1] = ["dcm"];

pub fn file_kind(path: &Path) -> Option<FileKind> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    if RASTER_EXTENSIONS.contains(&extension.as_str()) {
        Some(FileKind::Raster)
    } else if DICOM_EXTENSIONS.contains(&extension.as_str()) {
        Some(FileKind::Dicom)
    } else {
        None
    }
}

/// Checks type and size before a file is allowed into a workflow.
pub fn inspect_file(path: PathBuf) -> Result<StagedFile> {
    let kind = file_kind(&path).ok_or_else(|| Error::UnsupportedFile { path: path.clone() })?;
    let size_bytes = std::fs::metadata(&path)?.len();
    if size_bytes > MAX_FILE_BYTES {
        return Err(Error::FileTooLarge {
            path,
            size: size_bytes,
            limit: MAX_FILE_BYTES,
        });
    }

    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(StagedFile {
        path,
        name,
        size_bytes,
        kind,
    })
}

pub async fn load_preview(file: StagedFile) -> Result<Handle> {
    log::info!("Loading preview for {}", file.path.display());
    match file.kind {
        FileKind::Raster => {
            let bytes = tokio::fs::read(&file.path).await?;
            if bytes.is_empty() {
                return Err(Error::preview(format!("{} is empty", file.name)));
            }
            Ok(Handle::from_bytes(bytes))
        }
        FileKind::Dicom => {
            let path = file.path.clone();
            tokio::task::spawn_blocking(move || {
                let object = open_file(&path).map_err(|err| {
                    Error::dicom(format!("{}: failed to open DICOM file ({err})", path.display()))
                })?;
                FrameImagePipeline::render_first_frame(&object)?
                    .ok_or_else(|| Error::preview("DICOM object has no frames"))
            })
            .await
            .map_err(|err| Error::preview(format!("Preview task failed: {err}")))?
        }
    }
}

pub struct FrameImagePipeline;

impl FrameImagePipeline {
    pub fn render_first_frame(object: &DefaultDicomObject) -> Result<Option<Handle>> {
        let decoded = object
            .decode_pixel_data()
            .map_err(|err| Error::dicom(format!("Failed to decode pixel data: {err}")))?;

        if decoded.number_of_frames() == 0 {
            return Ok(None);
        }

        let handle = if decoded.photometric_interpretation().is_monochrome() {
            Self::monochrome_to_handle(&decoded)?
        } else {
            Self::color_to_handle(&decoded)?
        };
        Ok(Some(handle))
    }

    /// 16-bit grayscale is stretched to the frame's own min/max.
    fn monochrome_to_handle(decoded: &DecodedPixelData<'_>) -> Result<Handle> {
        let width = decoded.columns();
        let height = decoded.rows();
        let invert = matches!(
            decoded.photometric_interpretation(),
            PhotometricInterpretation::Monochrome1
        );

        let gray: Vec<u8> = if decoded.bits_allocated() <= 8 {
            decoded
                .to_vec_frame::<u8>(0)
                .map_err(|err| Error::dicom(format!("Failed to read frame: {err}")))?
        } else {
            let samples = decoded
                .to_vec_frame::<u16>(0)
                .map_err(|err| Error::dicom(format!("Failed to read frame: {err}")))?;
            let (min, max) = min_max(&samples).unwrap_or((0, 0));
            samples
                .iter()
                .map(|&value| stretch(value, min, max))
                .collect()
        };

        Ok(Handle::from_rgba(width, height, gray_to_rgba(&gray, invert)))
    }

    fn color_to_handle(decoded: &DecodedPixelData<'_>) -> Result<Handle> {
        let interpretation = decoded.photometric_interpretation().as_str().to_string();
        let image = decoded.to_dynamic_image(0).map_err(|err| {
            Error::dicom(format!(
                "Unsupported photometric interpretation `{interpretation}`: {err}"
            ))
        })?;
        let rgba = image.into_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Handle::from_rgba(width, height, rgba.into_raw()))
    }
}

fn gray_to_rgba(gray: &[u8], invert: bool) -> Vec<u8> {
    let mut rgba = Vec::with_capacity(gray.len() * 4);
    for &value in gray {
        let value = if invert { 255 - value } else { value };
        rgba.extend_from_slice(&[value, value, value, 255]);
    }
    rgba
}

fn min_max(values: &[u16]) -> Option<(u16, u16)> {
    values.iter().copied().fold(None, |acc, value| match acc {
        None => Some((value, value)),
        Some((min, max)) => Some((min.min(value), max.max(value))),
    })
}

fn stretch(value: u16, min: u16, max: u16) -> u8 {
    if max <= min {
        return 0;
    }

    let range = (max - min) as f32;
    let normalized = value.saturating_sub(min) as f32 / range;
    (normalized * 255.0).clamp(0.0, 255.0).round() as u8
}
