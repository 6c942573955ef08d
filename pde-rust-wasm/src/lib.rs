mod console;

use pde_core::{Solver as CoreSolver, SolverConfig};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() {
    console::init();
}

#[wasm_bindgen]
pub struct Solver {
    inner: CoreSolver,
}

#[wasm_bindgen]
impl Solver {
    /// `rgba` is canvas `ImageData.data` of a grayscale image.
    /// Unknown kind names fall back to heat / periodic / forward-euler.
    #[wasm_bindgen(constructor)]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        width: usize,
        height: usize,
        rgba: Vec<u8>,
        cell_spacing: f32,
        dt: f32,
        pde_type: &str,
        boundary_type: &str,
        scheme_type: &str,
        use_gpu: bool,
    ) -> Result<Solver, JsValue> {
        let config = SolverConfig {
            cell_spacing,
            dt,
            equation: pde_type.to_string().into(),
            boundary: boundary_type.to_string().into(),
            scheme: scheme_type.to_string().into(),
            use_gpu_path: use_gpu,
            ..SolverConfig::default()
        };
        let inner = CoreSolver::from_rgba(width, height, rgba, config)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Solver { inner })
    }

    /// Build from a JSON `SolverConfig`.
    pub fn with_config(
        width: usize,
        height: usize,
        rgba: Vec<u8>,
        config_json: &str,
    ) -> Result<Solver, JsValue> {
        let config: SolverConfig = serde_json::from_str(config_json)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let inner = CoreSolver::from_rgba(width, height, rgba, config)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Solver { inner })
    }

    // Configuration; invalid names are ignored and return false
    pub fn set_boundary_type(&mut self, kind: &str) -> bool { self.inner.set_boundary_by_name(kind) }
    pub fn set_pde_type(&mut self, kind: &str) -> bool { self.inner.set_pde_by_name(kind) }
    pub fn set_scheme_type(&mut self, kind: &str) -> bool { self.inner.set_scheme_by_name(kind) }
    pub fn set_use_gpu(&mut self, use_gpu: bool) { self.inner.set_use_gpu_path(use_gpu); }

    pub fn set_dt(&mut self, dt: f32) -> Result<(), JsValue> {
        self.inner.set_dt(dt).map_err(|e| JsValue::from_str(&e.to_string()))
    }
    pub fn set_cell_spacing(&mut self, dx: f32) -> Result<(), JsValue> {
        self.inner.set_cell_spacing(dx).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn coefficient(&self) -> f32 { self.inner.coefficient() }
    pub fn is_stable(&self) -> bool { self.inner.stability().is_stable() }
    pub fn width(&self) -> usize { self.inner.width() }
    pub fn height(&self) -> usize { self.inner.height() }

    // Copy-based JS access (reliable)
    pub fn step(&mut self) -> Vec<u8> {
        self.inner.step().as_bytes().to_vec()
    }
    pub fn step_n(&mut self, count: u32) -> Vec<u8> {
        self.inner.step_n(count).as_bytes().to_vec()
    }
    pub fn reset(&mut self) -> Vec<u8> {
        self.inner.reset();
        self.inner.output().as_bytes().to_vec()
    }
    pub fn get_image(&self) -> Vec<u8> {
        self.inner.output().as_bytes().to_vec()
    }

    // Step + timing (WASM-only); read the image with get_image()
    pub fn step_timed(&mut self, count: u32) -> StepInfo {
        let t0 = now_ms();
        self.inner.step_n(count);
        let t1 = now_ms();
        let stats = self.inner.last_stats();
        StepInfo {
            steps: count,
            iterations: stats.iterations,
            converged: stats.converged,
            compute_ms: t1 - t0,
        }
    }
}

#[wasm_bindgen]
pub struct StepInfo {
    steps: u32,
    iterations: u32,
    converged: bool,
    compute_ms: f64,
}

#[wasm_bindgen]
impl StepInfo {
    pub fn steps(&self) -> u32 { self.steps }
    pub fn iterations(&self) -> u32 { self.iterations }
    pub fn converged(&self) -> bool { self.converged }
    pub fn compute_ms(&self) -> f64 { self.compute_ms }
}


fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}
