use wasm_bindgen::prelude::*;
use image::DynamicImage;
use js_sys::{Array, Object, Reflect};
use log::info;
use rand::{SeedableRng, rngs::StdRng};

pub mod catalog;
pub mod clustering;
pub mod config;
pub mod error;
pub mod recommend;
pub mod sampler;
pub mod selector;
pub mod tfidf;

pub use catalog::{Catalog, CatalogRow};
pub use clustering::{Cluster, ClusterOptions, Palette, cluster, distinct_count, kmeans, to_palette};
pub use config::AnalyzerConfig;
pub use error::{PaletteError, Result};
pub use recommend::{Query, Recommendation, Recommender};
pub use sampler::{Pixel, pixels_of, resize, sample};
pub use selector::{score_candidates, select_k, silhouette_score};

// ------------------------------------------------------------
// Image analysis pipeline
// ------------------------------------------------------------

/// Extract the dominant colors of an image.
///
/// Steps performed:
/// 1. Down-scale so the longest side is at most `config.max_dimension`.
/// 2. Draw up to `config.sample_size` pixels at random (seeded).
/// 3. Pick k in `[config.k_min, config.k_max]` by silhouette score on the sample.
/// 4. Run k-means with that k over every pixel of the down-scaled image.
///
/// The result maps `#rrggbb` to the share of pixels in that cluster.
pub fn analyze_image(img: &DynamicImage, config: &AnalyzerConfig) -> Result<Palette> {
    config.validate()?;

    let working = resize(&img.to_rgb8(), config.max_dimension)?;
    let pixels = pixels_of(&working);

    let mut rng = StdRng::seed_from_u64(config.seed);
    let sampled = sample(&pixels, config.sample_size, &mut rng)?;

    let options = config.cluster_options();
    let best_k = select_k(&sampled, config.k_min, config.k_max, &options)?;
    // a near-flat image may hold fewer colors than the fallback k
    let k = best_k.min(distinct_count(&pixels));
    info!(
        "clustering {} pixels ({}x{}) with k={k}",
        pixels.len(),
        working.width(),
        working.height()
    );

    let clusters = cluster(&pixels, k, &options)?;
    Ok(to_palette(&clusters))
}

/// Decode `input` (any format the `image` crate understands) and analyse it.
pub fn analyze_bytes(input: &[u8], config: &AnalyzerConfig) -> Result<Palette> {
    if input.is_empty() {
        return Err(PaletteError::InvalidInput("empty image data".into()));
    }
    let img = image::load_from_memory(input)
        .map_err(|e| PaletteError::InvalidInput(format!("unable to decode image: {e}")))?;
    analyze_image(&img, config)
}

// ------------------------------------------------------------
// WebAssembly bindings
// ------------------------------------------------------------

fn js_error(e: PaletteError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Analyse an encoded image and return `{ "#rrggbb": share, ... }`.
///
/// `max_colors` overrides the upper end of the cluster-count scan.
#[wasm_bindgen]
pub fn analyze(input: Vec<u8>, max_colors: Option<usize>) -> Result<Object, JsValue> {
    let mut config = AnalyzerConfig::default();
    if let Some(k_max) = max_colors {
        config.k_max = k_max;
    }
    let palette = analyze_bytes(&input, &config).map_err(js_error)?;

    let result = Object::new();
    for (hex, share) in palette.iter() {
        Reflect::set(&result, &JsValue::from_str(hex), &JsValue::from_f64(share))?;
    }
    Ok(result)
}

/// Mood-based color recommendations over a catalog loaded once at construction.
#[wasm_bindgen]
pub struct ColorRecommender {
    inner: Recommender,
}

#[wasm_bindgen]
impl ColorRecommender {
    /// `catalog_text` is the semicolon-separated catalog table, header included.
    #[wasm_bindgen(constructor)]
    pub fn new(catalog_text: &str) -> Result<ColorRecommender, JsValue> {
        let catalog = Catalog::parse(catalog_text).map_err(js_error)?;
        Ok(Self {
            inner: Recommender::new(catalog),
        })
    }

    /// Returns up to five `{ name, code }` objects, best match first.
    pub fn recommend(&self, mood: &str, tema: &str, suasana: &str, kontras: &str) -> Result<Array, JsValue> {
        let picks = self
            .inner
            .recommend(mood, tema, suasana, kontras)
            .map_err(js_error)?;

        let out = Array::new();
        for pick in picks {
            let entry = Object::new();
            Reflect::set(&entry, &JsValue::from_str("name"), &JsValue::from_str(&pick.name))?;
            Reflect::set(&entry, &JsValue::from_str("code"), &JsValue::from_str(&pick.code))?;
            out.push(&entry);
        }
        Ok(out)
    }
}
