// src/video.rs - Camera capture
use anyhow::{anyhow, Result};
use image::{imageops, DynamicImage, ImageBuffer};
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
};
use nokhwa::Camera;
use tracing::info;

/// Requested capture resolution. Best-effort: the device may hand back
/// whatever format it considers closest.
pub const REQUESTED_WIDTH: u32 = 1280;
pub const REQUESTED_HEIGHT: u32 = 720;

pub struct CameraSource {
    camera: Camera,
}

impl CameraSource {
    /// Open the camera and its stream. Failure here is fatal for the
    /// application; there is no retry.
    pub fn new(index: u32) -> Result<Self> {
        let format = CameraFormat::new(
            Resolution::new(REQUESTED_WIDTH, REQUESTED_HEIGHT),
            FrameFormat::MJPEG,
            30,
        );
        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(format));

        let mut camera = Camera::new(CameraIndex::Index(index), requested)
            .map_err(|e| anyhow!("failed to open camera {}: {}", index, e))?;
        camera
            .open_stream()
            .map_err(|e| anyhow!("failed to open camera stream: {}", e))?;

        let actual = camera.resolution();
        info!(
            width = actual.width(),
            height = actual.height(),
            fps = camera.frame_rate(),
            "camera stream open"
        );

        Ok(Self { camera })
    }

    pub fn resolution(&self) -> (u32, u32) {
        let res = self.camera.resolution();
        (res.width(), res.height())
    }

    /// Capture one frame, mirrored horizontally so the on-screen preview
    /// behaves like a mirror.
    pub fn read_frame(&mut self) -> Result<DynamicImage> {
        let frame = self
            .camera
            .frame()
            .map_err(|e| anyhow!("failed to capture frame: {}", e))?;

        let decoded = frame
            .decode_image::<RgbFormat>()
            .map_err(|e| anyhow!("failed to decode frame: {}", e))?;

        let width = decoded.width();
        let height = decoded.height();
        let rgb_data = decoded.into_vec();

        let mut rgba_data = Vec::with_capacity((width * height * 4) as usize);
        for chunk in rgb_data.chunks(3) {
            rgba_data.push(chunk[0]);
            rgba_data.push(chunk[1]);
            rgba_data.push(chunk[2]);
            rgba_data.push(255);
        }

        let img = ImageBuffer::from_raw(width, height, rgba_data)
            .ok_or_else(|| anyhow!("failed to create image buffer"))?;
        let flipped = imageops::flip_horizontal(&img);
        Ok(DynamicImage::ImageRgba8(flipped))
    }
}

impl Drop for CameraSource {
    fn drop(&mut self) {
        let _ = self.camera.stop_stream();
    }
}
