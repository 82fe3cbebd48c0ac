/// Backing-store size for a canvas laid out at `client_width` x
/// `client_height` CSS pixels. High-density screens get the device ratio
/// applied; ratios at or below 1 keep the CSS size.
pub fn backing_size(client_width: i32, client_height: i32, device_pixel_ratio: f64) -> (u32, u32) {
    let w = client_width.max(0) as f64;
    let h = client_height.max(0) as f64;
    if device_pixel_ratio > 1.0 {
        (
            (w * device_pixel_ratio) as u32,
            (h * device_pixel_ratio) as u32,
        )
    } else {
        (w as u32, h as u32)
    }
}
