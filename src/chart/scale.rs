//! Scales that map dataset values to pixel positions or palette positions.
//!
//! Tick generation follows the familiar 1-2-5 rule: pick a power of ten close to
//! `span / count`, then multiply it by 1, 2, 5 or 10 so roughly `count` ticks fit.

use chrono::{Datelike, NaiveDate};
use ordered_float::OrderedFloat;

const E10: f64 = 7.0710678118654755; // sqrt(50)
const E5: f64 = 3.1622776601683795; // sqrt(10)
const E2: f64 = 1.4142135623730951; // sqrt(2)

/// `(min, max)` of the values, ignoring NaN. `None` if nothing is left.
pub fn extent<I>(values: I) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = f64>,
{
    let mut bounds: Option<(OrderedFloat<f64>, OrderedFloat<f64>)> = None;
    for value in values.into_iter().filter(|v| !v.is_nan()).map(OrderedFloat) {
        bounds = Some(match bounds {
            None => (value, value),
            Some((lo, hi)) => (lo.min(value), hi.max(value)),
        });
    }
    bounds.map(|(lo, hi)| (lo.into_inner(), hi.into_inner()))
}

/// Increment between ticks for `[start, stop]`.
///
/// Positive results are the step itself. Negative results encode a step below one
/// as its inverse (`-10` means `0.1`), which keeps tick values free of float drift.
pub fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    let step = (stop - start) / count.max(1) as f64;
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };
    if power >= 0.0 {
        factor * 10f64.powf(power)
    } else {
        -10f64.powf(-power) / factor
    }
}

/// The absolute tick step for `[start, stop]`, decoded from [`tick_increment`].
pub fn tick_step(start: f64, stop: f64, count: usize) -> f64 {
    let (lo, hi) = if stop < start { (stop, start) } else { (start, stop) };
    let inc = tick_increment(lo, hi, count);
    if inc < 0.0 {
        1.0 / -inc
    } else {
        inc
    }
}

/// Evenly spaced, round tick values inside `[start, stop]`.
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() {
        return vec![];
    }
    if start == stop {
        return vec![start];
    }
    let (lo, hi, reverse) = if stop < start {
        (stop, start, true)
    } else {
        (start, stop, false)
    };
    let inc = tick_increment(lo, hi, count);
    if !inc.is_finite() || inc == 0.0 {
        return vec![];
    }

    let mut values = Vec::new();
    if inc > 0.0 {
        let mut i1 = (lo / inc).round();
        let mut i2 = (hi / inc).round();
        if i1 * inc < lo {
            i1 += 1.0;
        }
        if i2 * inc > hi {
            i2 -= 1.0;
        }
        let mut i = i1;
        while i <= i2 {
            values.push(i * inc);
            i += 1.0;
        }
    } else {
        let inv = -inc;
        let mut i1 = (lo * inv).round();
        let mut i2 = (hi * inv).round();
        if i1 / inv < lo {
            i1 += 1.0;
        }
        if i2 / inv > hi {
            i2 -= 1.0;
        }
        let mut i = i1;
        while i <= i2 {
            values.push(i / inv);
            i += 1.0;
        }
    }
    if reverse {
        values.reverse();
    }
    values
}

/// Continuous linear mapping from a numeric domain to a numeric range.
///
/// A degenerate domain (both ends equal) maps every input to the middle of the range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    pub fn scale(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let t = if d1 == d0 { 0.5 } else { (value - d0) / (d1 - d0) };
        r0 + (r1 - r0) * t
    }

    pub fn invert(&self, pixel: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let t = if r1 == r0 { 0.5 } else { (pixel - r0) / (r1 - r0) };
        d0 + (d1 - d0) * t
    }

    /// Extends the domain outward so both ends land on round tick values.
    pub fn nice(mut self, count: usize) -> Self {
        let (mut start, mut stop) = self.domain;
        let reverse = stop < start;
        if reverse {
            std::mem::swap(&mut start, &mut stop);
        }
        let mut previous: Option<f64> = None;
        for _ in 0..10 {
            let step = tick_increment(start, stop, count);
            if previous == Some(step) || !step.is_finite() {
                break;
            }
            if step > 0.0 {
                start = (start / step).floor() * step;
                stop = (stop / step).ceil() * step;
            } else if step < 0.0 {
                start = (start * step).ceil() / step;
                stop = (stop * step).floor() / step;
            } else {
                break;
            }
            previous = Some(step);
        }
        self.domain = if reverse { (stop, start) } else { (start, stop) };
        self
    }

    pub fn ticks(&self, count: usize) -> Vec<f64> {
        ticks(self.domain.0, self.domain.1, count)
    }
}

/// Linear mapping from dates to pixels, ticked on whole years.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    domain: (NaiveDate, NaiveDate),
    linear: LinearScale,
}

impl TimeScale {
    pub fn new(domain: (NaiveDate, NaiveDate), range: (f64, f64)) -> Self {
        let days = (
            domain.0.num_days_from_ce() as f64,
            domain.1.num_days_from_ce() as f64,
        );
        Self {
            domain,
            linear: LinearScale::new(days, range),
        }
    }

    pub fn domain(&self) -> (NaiveDate, NaiveDate) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.linear.range()
    }

    pub fn scale(&self, date: NaiveDate) -> f64 {
        self.linear.scale(date.num_days_from_ce() as f64)
    }

    /// January 1st of every `k`th year inside the domain, with `k` chosen from the
    /// 1-2-5 sequence so that about `count` ticks appear.
    pub fn year_ticks(&self, count: usize) -> Vec<NaiveDate> {
        let (start, stop) = if self.domain.1 < self.domain.0 {
            (self.domain.1, self.domain.0)
        } else {
            self.domain
        };
        let first = if start.ordinal() == 1 { start.year() } else { start.year() + 1 };
        let last = stop.year();
        if first > last {
            return vec![];
        }
        let every = tick_step(first as f64, last as f64, count).round().max(1.0) as i32;
        let mut year = first.div_euclid(every) * every;
        if year < first {
            year += every;
        }
        let mut dates = Vec::new();
        while year <= last {
            if let Some(date) = NaiveDate::from_ymd_opt(year, 1, 1) {
                dates.push(date);
            }
            year += every;
        }
        dates
    }
}

/// Maps a small discrete domain onto evenly sized bands of a pixel range.
///
/// The domain keeps first-appearance order and drops duplicates. There is no
/// padding between or around bands.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale<K> {
    domain: Vec<K>,
    range: (f64, f64),
}

impl<K: PartialEq + Copy> BandScale<K> {
    pub fn new<I>(keys: I, range: (f64, f64)) -> Self
    where
        I: IntoIterator<Item = K>,
    {
        let mut domain: Vec<K> = Vec::new();
        for key in keys {
            if !domain.contains(&key) {
                domain.push(key);
            }
        }
        Self { domain, range }
    }

    pub fn domain(&self) -> &[K] {
        &self.domain
    }

    pub fn bandwidth(&self) -> f64 {
        if self.domain.is_empty() {
            return 0.0;
        }
        (self.range.1 - self.range.0) / self.domain.len() as f64
    }

    /// Start of the band for `key`, `None` if the key is not in the domain.
    pub fn scale(&self, key: K) -> Option<f64> {
        let index = self.domain.iter().position(|k| *k == key)?;
        Some(self.range.0 + self.bandwidth() * index as f64)
    }
}
