use crate::{wrap, Error, Result, TextBlock, TextMeasure, WrapOptions};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitParams {
    pub start_size: f32,
    pub min_size: f32,
    pub step: f32,
    pub max_width: f32,
    pub max_lines: usize,
    pub line_height: f32,
}

impl FitParams {
    pub fn validate(&self) -> Result<()> {
        let finite = [
            self.start_size,
            self.min_size,
            self.step,
            self.max_width,
            self.line_height,
        ]
        .iter()
        .all(|value| value.is_finite());
        if !finite {
            return Err(Error::Config("title fit values must be finite".to_string()));
        }
        if self.step <= 0.0 {
            return Err(Error::Config(format!(
                "title size step must be positive, got {}",
                self.step
            )));
        }
        if self.min_size <= 0.0 || self.start_size < self.min_size {
            return Err(Error::Config(format!(
                "title sizes must satisfy 0 < min ({}) <= start ({})",
                self.min_size, self.start_size
            )));
        }
        if self.max_width <= 0.0 {
            return Err(Error::Config(format!(
                "title width must be positive, got {}",
                self.max_width
            )));
        }
        if self.max_lines == 0 {
            return Err(Error::Config("title max lines must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Upper bound on wrap passes: every step plus the clamped floor.
    pub fn max_iterations(&self) -> usize {
        ((self.start_size - self.min_size) / self.step).ceil() as usize + 1
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FitOutcome {
    pub size: f32,
    pub block: TextBlock,
    pub iterations: usize,
    /// The floor size was reached with more than `max_lines` lines.
    pub overflowed: bool,
}

/// Shrinks the title size by `step` until it wraps into `max_lines` lines.
/// At `min_size` the result is accepted as is; titles are never ellipsized.
pub fn fit_title<M: TextMeasure + ?Sized>(
    text: &str,
    font: &M,
    params: FitParams,
) -> Result<FitOutcome> {
    params.validate()?;
    let options = WrapOptions::new(params.max_width, params.line_height);
    let mut size = params.start_size;
    let mut iterations = 0;
    loop {
        iterations += 1;
        let block = wrap(text, font, size, options);
        let fits = block.lines.len() <= params.max_lines;
        if fits || size <= params.min_size {
            return Ok(FitOutcome {
                size,
                overflowed: !fits,
                block,
                iterations,
            });
        }
        size = (size - params.step).max(params.min_size);
    }
}
