//! QR rendering for download links.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use droplink_core::AppError;
use qrcode::QrCode;

/// Render `url` as a scannable PNG, returned as a `data:image/png;base64,`
/// URL so clients can embed it directly in an `<img>` tag.
pub fn qr_data_url(url: &str) -> Result<String, AppError> {
    let code = QrCode::new(url.as_bytes())
        .map_err(|e| AppError::Internal(format!("qr encoding failed: {}", e)))?;

    let rendered = code
        .render::<image::Luma<u8>>()
        .max_dimensions(360, 360)
        .build();

    let mut png = Vec::new();
    image::DynamicImage::ImageLuma8(rendered)
        .write_to(
            &mut std::io::Cursor::new(&mut png),
            image::ImageFormat::Png,
        )
        .map_err(|e| AppError::Internal(format!("qr png encoding failed: {}", e)))?;

    Ok(format!("data:image/png;base64,{}", STANDARD.encode(&png)))
}
