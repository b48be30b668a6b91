use crate::foundation::core::{Frame, Rgba8};

/// Straight-alpha source-over.
///
/// A fully transparent `src` leaves `dst` untouched; a fully opaque `src` replaces it.
pub fn over(dst: Rgba8, src: Rgba8) -> Rgba8 {
    let sa = u32::from(src[3]);
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }

    let da = u32::from(dst[3]);
    let inv = 255 - sa;
    // Output alpha scaled by 255.
    let oa = sa * 255 + da * inv;
    if oa == 0 {
        return [0, 0, 0, 0];
    }

    let mut out = [0u8; 4];
    for i in 0..3 {
        let num = u32::from(src[i]) * sa * 255 + u32::from(dst[i]) * da * inv;
        out[i] = ((num + oa / 2) / oa).min(255) as u8;
    }
    out[3] = ((oa + 127) / 255).min(255) as u8;
    out
}

/// Paint `src` onto `dst` with its top-left corner at `(x, y)`, using `src`'s alpha as mask.
///
/// Pixels falling outside `dst` are clipped.
pub fn paste_over(dst: &mut Frame, src: &Frame, x: i64, y: i64) {
    for_each_overlap(dst, src, x, y, |d, s| over(d, s));
}

/// Copy `src` onto `dst` at `(x, y)`, replacing destination pixels including alpha.
pub fn paste_replace(dst: &mut Frame, src: &Frame, x: i64, y: i64) {
    for_each_overlap(dst, src, x, y, |_, s| s);
}

fn for_each_overlap(
    dst: &mut Frame,
    src: &Frame,
    x: i64,
    y: i64,
    op: impl Fn(Rgba8, Rgba8) -> Rgba8,
) {
    let (dw, dh) = (i64::from(dst.width()), i64::from(dst.height()));
    let (sw, sh) = (i64::from(src.width()), i64::from(src.height()));

    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + sw).min(dw);
    let y1 = (y + sh).min(dh);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let dst_w = dst.width() as usize;
    let data = dst.data_mut();
    for dy in y0..y1 {
        let sy = (dy - y) as u32;
        let src_row = src.row(sy);
        for dx in x0..x1 {
            let sx = (dx - x) as usize;
            let s = [
                src_row[sx * 4],
                src_row[sx * 4 + 1],
                src_row[sx * 4 + 2],
                src_row[sx * 4 + 3],
            ];
            let idx = ((dy as usize) * dst_w + (dx as usize)) * 4;
            let d = [data[idx], data[idx + 1], data[idx + 2], data[idx + 3]];
            data[idx..idx + 4].copy_from_slice(&op(d, s));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn over_src_alpha_0_is_noop() {
        let dst = [10, 20, 30, 40];
        assert_eq!(over(dst, [255, 255, 255, 0]), dst);
    }

    #[test]
    fn over_src_opaque_replaces_dst() {
        assert_eq!(over([0, 0, 0, 255], [255, 0, 0, 255]), [255, 0, 0, 255]);
    }

    #[test]
    fn over_dst_transparent_returns_src() {
        let src = [100, 110, 120, 200];
        assert_eq!(over([0, 0, 0, 0], src), src);
    }

    #[test]
    fn over_half_alpha_on_opaque_mixes() {
        let out = over([0, 0, 0, 255], [255, 255, 255, 128]);
        assert_eq!(out[3], 255);
        assert!((127..=129).contains(&out[0]));
    }

    #[test]
    fn paste_clips_negative_and_overflowing_offsets() {
        let mut dst = Frame::transparent(4, 4);
        let src = Frame::filled(3, 3, [1, 2, 3, 255]);
        paste_over(&mut dst, &src, -1, 2);
        assert_eq!(dst.pixel(0, 2), Some([1, 2, 3, 255]));
        assert_eq!(dst.pixel(1, 3), Some([1, 2, 3, 255]));
        assert_eq!(dst.pixel(2, 2), Some([0, 0, 0, 0]));
        assert_eq!(dst.pixel(0, 1), Some([0, 0, 0, 0]));
    }

    #[test]
    fn paste_replace_overwrites_alpha() {
        let mut dst = Frame::filled(2, 1, [9, 9, 9, 255]);
        let src = Frame::transparent(1, 1);
        paste_replace(&mut dst, &src, 1, 0);
        assert_eq!(dst.pixel(1, 0), Some([0, 0, 0, 0]));
        assert_eq!(dst.pixel(0, 0), Some([9, 9, 9, 255]));
    }
}
