use clap::ValueEnum;
use pde_core::codec::quantize;
use pde_core::solver::MIN_GRID;
use pde_core::{LuminanceImage, SolverError};
use rand::Rng;

/// Procedural seed images, for running the solver without an input file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SeedPattern {
    Gaussians,
    Rectangles,
    SmoothNoise,
    GradientMix,
    /// Pick one of the above with the RNG.
    Random,
}

impl SeedPattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeedPattern::Gaussians => "gaussians",
            SeedPattern::Rectangles => "rectangles",
            SeedPattern::SmoothNoise => "smooth_noise",
            SeedPattern::GradientMix => "gradient_mix",
            SeedPattern::Random => "random",
        }
    }

    /// Replace `Random` with a concrete pattern.
    pub fn resolve<R: Rng>(self, rng: &mut R) -> SeedPattern {
        if self != SeedPattern::Random {
            return self;
        }
        match rng.gen_range(0..4) {
            0 => SeedPattern::Gaussians,
            1 => SeedPattern::Rectangles,
            2 => SeedPattern::SmoothNoise,
            _ => SeedPattern::GradientMix,
        }
    }
}

/// Render `pattern` as a `w x h` achromatic RGBA image. Returns the concrete
/// pattern that was drawn, which differs from `pattern` for `Random`.
pub fn generate_seed<R: Rng>(
    rng: &mut R,
    w: usize,
    h: usize,
    pattern: SeedPattern,
) -> Result<(SeedPattern, LuminanceImage), SolverError> {
    if w < MIN_GRID || h < MIN_GRID {
        return Err(SolverError::GridTooSmall {
            width: w,
            height: h,
        });
    }
    let pattern = pattern.resolve(rng);
    let field = generate_field(rng, w, h, pattern);
    let rgba = field
        .iter()
        .flat_map(|&v| {
            let l = quantize(v);
            [l, l, l, 255]
        })
        .collect();
    Ok((pattern, LuminanceImage::from_rgba(w, h, rgba)?))
}

fn add_gaussian(f: &mut [f32], w: usize, h: usize, cx: f32, cy: f32, sigma: f32, amp: f32) {
    for y in 0..h {
        for x in 0..w {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            let r2 = dx * dx + dy * dy;
            f[y * w + x] += amp * (-0.5 * r2 / (sigma * sigma)).exp();
        }
    }
}

fn generate_field<R: Rng>(rng: &mut R, w: usize, h: usize, pattern: SeedPattern) -> Vec<f32> {
    let mut f = vec![0.0f32; w * h];
    let (wf, hf) = (w as f32 - 1.0, h as f32 - 1.0);
    let span = w.min(h) as f32;

    match pattern {
        SeedPattern::Gaussians | SeedPattern::Random => {
            let blobs = rng.gen_range(1..=3);
            for _ in 0..blobs {
                let cx = rng.gen_range(0.15..0.85) * wf;
                let cy = rng.gen_range(0.15..0.85) * hf;
                let sigma = rng.gen_range(0.03..0.1) * span;
                let amp = rng.gen_range(0.6..1.0);
                add_gaussian(&mut f, w, h, cx, cy, sigma.max(1.0), amp);
            }
        }

        SeedPattern::Rectangles => {
            let rects = rng.gen_range(1..=4);
            for _ in 0..rects {
                let x0 = rng.gen_range(0..w / 2 + 1);
                let y0 = rng.gen_range(0..h / 2 + 1);
                let x1 = (x0 + rng.gen_range(1..w / 2 + 2)).min(w - 1);
                let y1 = (y0 + rng.gen_range(1..h / 2 + 2)).min(h - 1);
                let val = rng.gen_range(0.5..1.0);

                for y in y0..=y1 {
                    for x in x0..=x1 {
                        f[y * w + x] = f[y * w + x].max(val);
                    }
                }
            }
        }

        SeedPattern::SmoothNoise => {
            for v in f.iter_mut() {
                *v = rng.gen_range(0.0..1.0);
            }
            f = box_blur(&f, w, h, 2);
        }

        SeedPattern::GradientMix => {
            let dir = rng.gen_range(0..4);
            for y in 0..h {
                for x in 0..w {
                    let t = match dir {
                        0 => x as f32 / wf,
                        1 => y as f32 / hf,
                        2 => 1.0 - x as f32 / wf,
                        _ => 1.0 - y as f32 / hf,
                    };
                    f[y * w + x] = 0.6 * t;
                }
            }
            let cx = rng.gen_range(0.2..0.8) * wf;
            let cy = rng.gen_range(0.2..0.8) * hf;
            let sigma = rng.gen_range(0.04..0.12) * span;
            let amp = rng.gen_range(0.4..0.9);
            add_gaussian(&mut f, w, h, cx, cy, sigma.max(1.0), amp);
        }
    }

    normalize_peak(&mut f);
    f
}

/// Scale so the brightest sample is 1.
fn normalize_peak(f: &mut [f32]) {
    let mx = f.iter().copied().fold(0.0f32, f32::max);
    if mx > 0.0 {
        for v in f.iter_mut() {
            *v = (*v / mx).clamp(0.0, 1.0);
        }
    }
}

fn box_blur(src: &[f32], w: usize, h: usize, passes: usize) -> Vec<f32> {
    let mut cur = src.to_vec();
    let mut tmp = vec![0.0f32; w * h];

    for _ in 0..passes {
        for y in 0..h {
            for x in 0..w {
                let mut sum = 0.0;
                let mut cnt = 0.0;
                for yy in y.saturating_sub(1)..=(y + 1).min(h - 1) {
                    for xx in x.saturating_sub(1)..=(x + 1).min(w - 1) {
                        sum += cur[yy * w + xx];
                        cnt += 1.0;
                    }
                }
                tmp[y * w + x] = sum / cnt;
            }
        }
        std::mem::swap(&mut cur, &mut tmp);
    }
    cur
}
