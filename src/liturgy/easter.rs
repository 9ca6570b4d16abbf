use chrono::NaiveDate;

/// Easter Sunday for `year` in the Gregorian calendar, using the anonymous
/// (Meeus/Jones/Butcher) algorithm.
///
/// Results are only meaningful from 1583 onwards.
///
/// # Panics
///
/// Panics if `year` is outside the range `chrono::NaiveDate` can represent.
pub fn compute_easter(year: i32) -> NaiveDate {
    let a = year.rem_euclid(19);
    let b = year.div_euclid(100);
    let c = year.rem_euclid(100);
    let (d, e) = (b.div_euclid(4), b.rem_euclid(4));
    let f = (b + 8).div_euclid(25);
    let g = (b - f + 1).div_euclid(3);
    let h = (19 * a + b - d - g + 15).rem_euclid(30);
    let (i, k) = (c / 4, c % 4);
    let l = (32 + 2 * e + 2 * i - h - k).rem_euclid(7);
    let m = (a + 11 * h + 22 * l) / 451;
    let n = h + l - 7 * m + 114;

    let month = (n / 31) as u32;
    let day = (n % 31 + 1) as u32;

    NaiveDate::from_ymd_opt(year, month, day).expect("Easter always falls in March or April")
}
