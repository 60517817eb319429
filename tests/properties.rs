// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use image::{GrayImage, Luma, Rgb, RgbImage};
use seamscale::{
    build_resize_map, calculate_energy, carve_seams, extract_seams, find_min_seam, insert_seam,
    remove_object, remove_seam, Direction, Rect, Seam,
};
use test_log::test;

fn landscape(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let sky = y < height / 3;
        Rgb([
            if sky { 120 } else { ((x * 37 + y * 5) % 200) as u8 },
            if sky { 170 } else { ((x * x + 3 * y) % 180) as u8 },
            if sky { 230 } else { ((x * y) % 90) as u8 },
        ])
    })
}

#[test]
fn transforms_change_the_width_by_one() {
    let image = landscape(9, 7);
    let energy = calculate_energy(&image).unwrap();
    let seam = find_min_seam(&image, &energy).unwrap();
    assert_eq!(remove_seam(&image, &seam).unwrap().width(), 8);
    assert_eq!(insert_seam(&image, &seam).unwrap().width(), 10);
}

#[test]
fn solver_seams_are_connected_and_full_height() {
    let image = landscape(15, 11);
    let (batch, _) = carve_seams(&image, 6).unwrap();
    for seam in &batch {
        assert_eq!(seam.len(), 11);
        assert!(seam
            .columns()
            .windows(2)
            .all(|pair| (pair[0] as i64 - pair[1] as i64).abs() <= 1));
    }
}

#[test]
fn extraction_shrinks_the_working_grid() {
    let image = landscape(12, 6);
    let (batch, rest) = carve_seams(&image, 7).unwrap();
    assert_eq!(batch.len(), 7);
    assert_eq!(rest.width(), 5);
    assert!(extract_seams(&image, 12).is_err());
}

#[test]
fn bright_centre_column_scenario() {
    let image = GrayImage::from_fn(4, 4, |x, _| Luma([[3, 4, 250, 4][x as usize]]));
    let energy = calculate_energy(&image).unwrap();
    assert_eq!(find_min_seam(&image, &energy).unwrap(), Seam::from(vec![2, 2, 2, 2]));
}

#[test]
fn ten_by_twenty_at_half_scale() {
    // Ten rows, twenty columns.
    let image = landscape(20, 10);
    let map = build_resize_map(&image, 0.5, Direction::Horizontal).unwrap();
    let removal_ranks = map.ranks.removal_ranks();
    assert_eq!(removal_ranks.len(), 10);
    assert!(removal_ranks.len() <= 19);
    assert_eq!(map.scale(0.5).unwrap().dimensions(), (10, 10));
}

#[test]
fn unit_scale_restores_the_original_both_ways() {
    let image = landscape(14, 9);
    for direction in [Direction::Horizontal, Direction::Vertical] {
        let map = build_resize_map(&image, 0.7, direction).unwrap();
        assert_eq!(map.scale(1.0).unwrap(), image, "{:?}", direction);
    }
}

#[test]
fn scaling_never_narrows_as_scale_grows() {
    let image = landscape(16, 8);
    let map = build_resize_map(&image, 0.75, Direction::Horizontal).unwrap();
    let widths: Vec<u32> = (1..=40)
        .map(|step| map.scale(f64::from(step) * 0.05).unwrap().width())
        .collect();
    assert!(widths.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(widths.first(), Some(&4));
    assert_eq!(widths.last(), Some(&28));
}

#[test]
fn enlarged_output_contains_the_original_pixels_in_order() {
    let image = landscape(10, 5);
    let map = build_resize_map(&image, 0.5, Direction::Horizontal).unwrap();
    let grown = map.scale(1.3).unwrap();
    assert_eq!(grown.dimensions(), (13, 5));
    for y in 0..5 {
        let row: Vec<Rgb<u8>> = (0..13).map(|x| *grown.get_pixel(x, y)).collect();
        let mut cursor = row.iter();
        for x in 0..10 {
            let wanted = image.get_pixel(x, y);
            assert!(cursor.any(|p| p == wanted), "row {} lost pixel {}", y, x);
        }
    }
}

#[test]
fn object_removal_keeps_dimensions() {
    let image = landscape(18, 12);
    for rect in [
        Rect::new(0, 0, 0, 0),
        Rect::new(3, 7, 4, 9),
        Rect::new(10, 17, 0, 11),
        Rect::new(2, 12, 5, 5),
    ] {
        let out = remove_object(&image, rect).unwrap();
        assert_eq!(out.dimensions(), image.dimensions(), "{:?}", rect);
    }
}
