use super::timeline::ViewScale;

/// Grid unit a drag is quantized to. Week snaps to days and Month to
/// (30-day) days; every other scale snaps to whole columns.
pub fn snap_unit(scale: ViewScale, column_width: f64) -> f64 {
    match scale {
        ViewScale::Week => column_width / 7.0,
        ViewScale::Month => column_width / 30.0,
        _ => column_width,
    }
}

/// Round a raw pixel delta to the nearest grid unit, ties away from the
/// left. Negative deltas round the same way as positive ones.
pub fn snap(raw: f64, scale: ViewScale, column_width: f64) -> f64 {
    let unit = snap_unit(scale, column_width);
    if !raw.is_finite() || unit.is_nan() || unit <= 0.0 {
        return raw;
    }
    let whole = (raw / unit).floor();
    let rem = raw - whole * unit;
    if rem < unit / 2.0 {
        whole * unit
    } else {
        (whole + 1.0) * unit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_scale_snaps_to_columns() {
        assert_eq!(snap(0.0, ViewScale::Day, 38.0), 0.0);
        assert_eq!(snap(18.0, ViewScale::Day, 38.0), 0.0);
        assert_eq!(snap(19.0, ViewScale::Day, 38.0), 38.0);
        assert_eq!(snap(60.0, ViewScale::Day, 38.0), 76.0);
    }

    #[test]
    fn test_negative_deltas_round_to_nearest() {
        assert_eq!(snap(-20.0, ViewScale::Day, 38.0), -38.0);
        assert_eq!(snap(-18.0, ViewScale::Day, 38.0), 0.0);
        assert_eq!(snap(-19.0, ViewScale::Day, 38.0), 0.0);
    }

    #[test]
    fn test_week_and_month_snap_to_days() {
        assert_eq!(snap(25.0, ViewScale::Week, 140.0), 20.0);
        assert_eq!(snap(31.0, ViewScale::Week, 140.0), 40.0);
        assert_eq!(snap(5.0, ViewScale::Month, 120.0), 4.0);
        assert_eq!(snap(6.5, ViewScale::Month, 120.0), 8.0);
    }

    #[test]
    fn test_snap_is_idempotent() {
        for scale in ViewScale::ALL {
            let cw = scale.column_width();
            for i in -400..400 {
                let raw = f64::from(i) * 0.73;
                let once = snap(raw, scale, cw);
                assert_eq!(snap(once, scale, cw), once, "{scale} at {raw}");
            }
        }
    }

    #[test]
    fn test_degenerate_unit_passes_through() {
        assert_eq!(snap(12.5, ViewScale::Day, 0.0), 12.5);
    }
}
