use serde::{Deserialize, Serialize};

use crate::domain::{PhotoUrls, WallpaperQuality};

/// Where an image URL is going to be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageRequest {
    /// Thumbnail in a scrolling grid.
    Grid,
    /// Full-screen preview.
    Preview,
    /// File saved to the device; always the largest variant.
    Download,
}

fn first<'a>(candidates: &[&'a Option<String>]) -> Option<&'a str> {
    candidates.iter().find_map(|c| (*c).as_deref())
}

/// Pick the best available URL for `request` at the given quality.
///
/// Each arm lists variants in order of preference; the first one present
/// wins. Downloads ignore the quality setting.
pub fn select_image_url(
    urls: &PhotoUrls,
    quality: WallpaperQuality,
    request: ImageRequest,
) -> Option<&str> {
    use WallpaperQuality::*;

    match request {
        ImageRequest::Download => first(&[&urls.raw, &urls.full, &urls.regular]),
        ImageRequest::Grid => match quality {
            Low => first(&[&urls.thumb, &urls.small]),
            Medium => first(&[&urls.small, &urls.regular]),
            // regular is the ceiling for grid cells
            High | Raw => first(&[&urls.regular, &urls.small]),
            Original => first(&[&urls.small, &urls.regular]),
        },
        ImageRequest::Preview => match quality {
            Low => first(&[&urls.small, &urls.regular]),
            Medium => first(&[&urls.regular, &urls.full]),
            High | Original => first(&[&urls.full, &urls.regular]),
            Raw => first(&[&urls.raw, &urls.full, &urls.regular]),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_urls() -> PhotoUrls {
        PhotoUrls {
            raw: Some("raw".into()),
            full: Some("full".into()),
            regular: Some("regular".into()),
            small: Some("small".into()),
            thumb: Some("thumb".into()),
        }
    }

    #[test]
    fn test_grid_selection() {
        let urls = all_urls();
        let grid = |q| select_image_url(&urls, q, ImageRequest::Grid);
        assert_eq!(grid(WallpaperQuality::Low), Some("thumb"));
        assert_eq!(grid(WallpaperQuality::Medium), Some("small"));
        assert_eq!(grid(WallpaperQuality::High), Some("regular"));
        assert_eq!(grid(WallpaperQuality::Original), Some("small"));
        assert_eq!(grid(WallpaperQuality::Raw), Some("regular"));
    }

    #[test]
    fn test_preview_selection() {
        let urls = all_urls();
        let preview = |q| select_image_url(&urls, q, ImageRequest::Preview);
        assert_eq!(preview(WallpaperQuality::Low), Some("small"));
        assert_eq!(preview(WallpaperQuality::Medium), Some("regular"));
        assert_eq!(preview(WallpaperQuality::High), Some("full"));
        assert_eq!(preview(WallpaperQuality::Original), Some("full"));
        assert_eq!(preview(WallpaperQuality::Raw), Some("raw"));
    }

    #[test]
    fn test_download_ignores_quality() {
        let urls = all_urls();
        for quality in WallpaperQuality::ALL.into_iter().chain([WallpaperQuality::Raw]) {
            assert_eq!(select_image_url(&urls, quality, ImageRequest::Download), Some("raw"));
        }
    }

    #[test]
    fn test_fallbacks_when_variants_missing() {
        let urls = PhotoUrls {
            regular: Some("regular".into()),
            ..Default::default()
        };
        assert_eq!(
            select_image_url(&urls, WallpaperQuality::Low, ImageRequest::Grid),
            None
        );
        assert_eq!(
            select_image_url(&urls, WallpaperQuality::Low, ImageRequest::Preview),
            Some("regular")
        );
        assert_eq!(
            select_image_url(&urls, WallpaperQuality::Original, ImageRequest::Preview),
            Some("regular")
        );
        assert_eq!(
            select_image_url(&urls, WallpaperQuality::High, ImageRequest::Download),
            Some("regular")
        );
        assert_eq!(
            select_image_url(&PhotoUrls::default(), WallpaperQuality::High, ImageRequest::Download),
            None
        );
    }
}
