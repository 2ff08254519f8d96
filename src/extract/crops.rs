use std::path::Path;

use image::DynamicImage;

use crate::extract::rows::Row;

/// Save one horizontal strip per clustered row for manual threshold
/// calibration.
///
/// Diagnostic only: every failure is logged and swallowed so this can
/// never affect the extracted events.
pub fn save_row_crops(image: &DynamicImage, rows: &[Row], dir: &Path) {
    if let Err(err) = std::fs::create_dir_all(dir) {
        log::warn!("row crops: cannot create {}: {err}", dir.display());
        return;
    }

    for (idx, row) in rows.iter().enumerate() {
        let y = row.y_min.max(0) as u32;
        if y >= image.height() {
            continue;
        }
        let height = ((row.y_max - row.y_min).max(1) as u32).min(image.height() - y);

        let strip = image.crop_imm(0, y, image.width(), height);
        let path = dir.join(format!("row_{idx:03}.png"));
        if let Err(err) = strip.save(&path) {
            log::warn!("row crops: failed to save {}: {err}", path.display());
        }
    }
}
