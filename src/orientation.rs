//! Orientation classification from probed dimensions.

use crate::media::Orientation;
use crate::probe::Dimensions;

/// Orientation tag value that exiftool reports for an unrotated image.
pub const NORMAL_ORIENTATION_TAG: &str = "Horizontal (normal)";

/// Classifies probed dimensions as vertical or horizontal.
///
/// Rules are checked in order and the first one that applies wins:
/// 1. A non-zero rotation: positive is vertical, negative is horizontal.
/// 2. A non-empty orientation tag: `"Horizontal (normal)"` is horizontal,
///    anything else is vertical.
/// 3. Aspect ratio: wider than tall is horizontal, otherwise vertical.
///
/// The rotation rule follows the sign reported by the probe tool, not the
/// physical angle, so a 180 degree rotation counts as vertical.
///
/// # Examples
///
/// ```
/// use mediatidy::media::Orientation;
/// use mediatidy::orientation::classify;
/// use mediatidy::probe::Dimensions;
///
/// assert_eq!(classify(&Dimensions::new(1920, 1080)), Orientation::Horizontal);
/// assert_eq!(classify(&Dimensions::new(1920, 1080).with_rotation(90)), Orientation::Vertical);
/// ```
pub fn classify(dimensions: &Dimensions) -> Orientation {
    if let Some(rotation) = dimensions.rotation
        && rotation != 0
    {
        return if rotation > 0 {
            Orientation::Vertical
        } else {
            Orientation::Horizontal
        };
    }

    if let Some(tag) = dimensions.orientation.as_deref()
        && !tag.is_empty()
    {
        return if tag == NORMAL_ORIENTATION_TAG {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        };
    }

    if dimensions.width > dimensions.height {
        Orientation::Horizontal
    } else {
        Orientation::Vertical
    }
}
