//! Picking among several favicons.
//!
//! Favicons without a declared size never win: they rank below every sized
//! favicon for [`largest`] and above every sized favicon for [`smallest`].
//! Ties go to the favicon listed first.

use std::cmp::Ordering;

use crate::{Error, Favicon, FaviconUrl, Result};

/// The favicon with the largest declared area.
pub fn largest(favicons: &[FaviconUrl]) -> Result<&FaviconUrl> {
    pick(favicons, |candidate, best| {
        compare_area(candidate, best, f64::NEG_INFINITY) == Ordering::Greater
    })
}

/// The favicon with the smallest declared area.
pub fn smallest(favicons: &[FaviconUrl]) -> Result<&FaviconUrl> {
    pick(favicons, |candidate, best| {
        compare_area(candidate, best, f64::INFINITY) == Ordering::Less
    })
}

/// The downloaded favicon with the most pixels. Every favicon has to carry a
/// decoded image.
pub fn largest_image(favicons: &[Favicon]) -> Result<&Favicon> {
    pick_image(favicons, |candidate, best| candidate > best)
}

/// The downloaded favicon with the fewest pixels. Every favicon has to carry
/// a decoded image.
pub fn smallest_image(favicons: &[Favicon]) -> Result<&Favicon> {
    pick_image(favicons, |candidate, best| candidate < best)
}

/// The first favicon whose `rel` or meta name is `format`, e.g.
/// `apple-touch-icon`.
pub fn preferred<'a>(favicons: &'a [FaviconUrl], format: &str) -> Option<&'a FaviconUrl> {
    favicons
        .iter()
        .find(|favicon| favicon.format().as_str().eq_ignore_ascii_case(format.trim()))
}

fn compare_area(a: &FaviconUrl, b: &FaviconUrl, unsized_area: f64) -> Ordering {
    let area = |f: &FaviconUrl| f.size().map_or(unsized_area, |size| size.area());
    area(a).total_cmp(&area(b))
}

fn pick<T>(items: &[T], beats: impl Fn(&T, &T) -> bool) -> Result<&T> {
    let (first, rest) = items.split_first().ok_or(Error::NotFound)?;
    Ok(rest
        .iter()
        .fold(first, |best, item| if beats(item, best) { item } else { best }))
}

fn pick_image(favicons: &[Favicon], beats: impl Fn(u64, u64) -> bool) -> Result<&Favicon> {
    if favicons.iter().any(|favicon| favicon.image().is_none()) {
        return Err(Error::ImageNotDownloaded);
    }
    let area = |favicon: &Favicon| favicon.image().map_or(0, |image| image.area());
    pick(favicons, |candidate, best| beats(area(candidate), area(best)))
}
