use std::io::Cursor;

use sprite_compose::{
    ActionOpts, Background, BoundingBox, Durations, Frame, FrameSequence, MergeOpts,
    OutputFormat, Side, TRANSPARENT, ZOrder, apply_background, compose_action,
    compute_bounding_box, crop, decode_frame, decode_sequence, encode, merge, pfp_placeholder,
};

const RED: [u8; 4] = [255, 0, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];

fn png(frame: &Frame) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(frame.to_rgba_image())
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn red_and_blue_squares_with_pad_ten() {
    let red = decode_frame(&png(&Frame::filled(40, 40, RED))).unwrap();
    let blue = decode_frame(&png(&Frame::filled(40, 40, BLUE))).unwrap();

    let out = merge(
        Side::Still(&red),
        Side::Still(&blue),
        &MergeOpts {
            pad: 10,
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(out.len(), 1);
    let f = &out[0];
    assert_eq!(f.dimensions(), (90, 40));

    for y in [0, 20, 39] {
        assert!((0..40).all(|x| f.pixel(x, y) == Some(RED)));
        assert!((40..50).all(|x| f.pixel(x, y) == Some(TRANSPARENT)));
        assert!((50..90).all(|x| f.pixel(x, y) == Some(BLUE)));
    }
}

#[test]
fn merged_opaque_rectangles_trim_to_summed_width() {
    let a = Frame::filled(17, 9, RED);
    let b = Frame::filled(23, 14, BLUE);
    let bg = [0, 0, 0, 0];
    let merged = merge(
        (&a).into(),
        (&b).into(),
        &MergeOpts {
            pad: 0,
            z_order: ZOrder::LeftOnTop,
            background: bg,
        },
    )
    .unwrap();
    let bbox = compute_bounding_box(&merged, Some(bg)).unwrap();
    assert_eq!(bbox.width(), 17 + 23);
    assert_eq!(bbox.height(), 14);
}

#[test]
fn bounding_box_is_minimal_across_frames() {
    let mut a = Frame::transparent(20, 20);
    sprite_compose::paste_over(&mut a, &Frame::filled(3, 2, RED), 4, 6);
    let mut b = Frame::transparent(20, 20);
    sprite_compose::paste_over(&mut b, &Frame::filled(2, 5, BLUE), 11, 9);
    let frames = [a, b];

    let bbox = compute_bounding_box(&frames, None).unwrap();
    assert_eq!(bbox, BoundingBox::new(4, 6, 13, 14).unwrap());

    // every visible pixel is inside
    for f in &frames {
        for y in 0..20 {
            for x in 0..20 {
                if f.pixel(x, y).unwrap()[3] > 0 {
                    assert!(bbox.contains(x, y));
                }
            }
        }
    }

    // idempotent once cropped
    let cropped: Vec<Frame> = frames.iter().map(|f| crop(f, bbox)).collect();
    assert_eq!(
        compute_bounding_box(&cropped, None).unwrap(),
        BoundingBox::full(bbox.width(), bbox.height())
    );
}

#[test]
fn background_fit_check() {
    let bg = Background::Image(Frame::filled(64, 64, [30, 120, 30, 255]));
    assert!(apply_background(&Frame::filled(65, 10, RED), &bg, None, None).is_none());

    let out = apply_background(&Frame::filled(40, 40, RED), &bg, None, None).unwrap();
    assert_eq!(out.dimensions(), (64, 64));
}

#[test]
fn profile_picture_action_round_trips_through_gif() {
    let actor_frames: Vec<Frame> = (0..3)
        .map(|i| {
            let mut f = Frame::transparent(30, 60);
            sprite_compose::paste_over(&mut f, &Frame::filled(10 + i * 2, 20, RED), 10, 10);
            f
        })
        .collect();
    let actor = FrameSequence::new(actor_frames, vec![180, 450, 180]).unwrap();
    let target = pfp_placeholder(&Frame::filled(100, 100, BLUE), 32).unwrap();

    let seq = compose_action(&actor, &target, &ActionOpts::default()).unwrap();
    assert_eq!(seq.len(), 3);

    let bytes = encode(
        seq.frames(),
        &Durations::PerFrame(seq.durations_ms().to_vec()),
        true,
        OutputFormat::Animated,
    )
    .unwrap();
    let back = decode_sequence(&bytes).unwrap();
    assert_eq!(back.durations_ms(), &[180, 450, 180]);
    assert_eq!(back.first().dimensions(), seq.first().dimensions());
}
