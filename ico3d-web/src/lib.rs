//! ico3d Web - WASM bindings for icosphere geometry and WebGL2 buffers
//!
//! `WebIcoSphere` hands the generated buffers to JS as typed arrays;
//! `IcoSphereModel` uploads them into WebGL2 buffers. Drawing is left to the
//! caller.
use ico3d_core::{IcoSphereError, IcoSphereGeometry, IcoSphereParams};
use js_sys::{Float32Array, Function};
use log::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, WebGl2RenderingContext as Gl, WebGlBuffer};

fn to_js_error(err: IcoSphereError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

/// Generated icosphere exposed to JS
#[wasm_bindgen]
pub struct WebIcoSphere {
    geometry: IcoSphereGeometry,
}

#[wasm_bindgen]
impl WebIcoSphere {
    /// Generate a sphere. Throws on a negative count or one above the cap.
    ///
    /// `onVertexAdded(index, Float32Array[x, y, z])` is called for every vertex
    /// added beyond the base icosahedron; its return value is ignored and
    /// exceptions are logged. `maxIterations` raises or lowers the default cap.
    #[wasm_bindgen(constructor)]
    pub fn new(
        iterations: i32,
        on_vertex_added: Option<Function>,
        max_iterations: Option<u32>,
    ) -> Result<WebIcoSphere, JsValue> {
        let mut params =
            IcoSphereParams::from_signed_iterations(i64::from(iterations)).map_err(to_js_error)?;
        if let Some(max) = max_iterations {
            params = params.with_max_iterations(max);
        }

        let geometry = match on_vertex_added {
            Some(callback) => IcoSphereGeometry::generate_with(&params, |index, p| {
                let position = Float32Array::from(&[p.x, p.y, p.z][..]);
                let result = callback.call2(&JsValue::NULL, &JsValue::from(index), &position);
                log_callback_failure(index, result);
            }),
            None => IcoSphereGeometry::generate(&params),
        }
        .map_err(to_js_error)?;

        Ok(WebIcoSphere { geometry })
    }

    #[wasm_bindgen(getter)]
    pub fn positions(&self) -> Vec<f32> {
        self.geometry.positions().to_vec()
    }

    #[wasm_bindgen(getter)]
    pub fn indices(&self) -> Vec<u32> {
        self.geometry.indices().to_vec()
    }

    #[wasm_bindgen(getter)]
    pub fn normals(&self) -> Vec<f32> {
        self.geometry.normals().to_vec()
    }

    #[wasm_bindgen(getter, js_name = texCoords)]
    pub fn tex_coords(&self) -> Vec<f32> {
        self.geometry.tex_coords().to_vec()
    }

    #[wasm_bindgen(getter, js_name = vertexCount)]
    pub fn vertex_count(&self) -> usize {
        self.geometry.vertex_count()
    }

    #[wasm_bindgen(getter, js_name = triangleCount)]
    pub fn triangle_count(&self) -> usize {
        self.geometry.triangle_count()
    }
}

impl WebIcoSphere {
    pub fn geometry(&self) -> &IcoSphereGeometry {
        &self.geometry
    }
}

/// WebGL2 buffers holding an icosphere, created with `STATIC_DRAW`
#[wasm_bindgen]
pub struct IcoSphereModel {
    positions: WebGlBuffer,
    normals: WebGlBuffer,
    tex_coords: WebGlBuffer,
    indices: WebGlBuffer,
    index_count: usize,
}

#[wasm_bindgen]
impl IcoSphereModel {
    #[wasm_bindgen(constructor)]
    pub fn new(gl: &Gl, sphere: &WebIcoSphere) -> Result<IcoSphereModel, JsValue> {
        Self::from_geometry(gl, sphere.geometry())
    }

    #[wasm_bindgen(getter, js_name = positionBuffer)]
    pub fn position_buffer(&self) -> WebGlBuffer {
        self.positions.clone()
    }

    #[wasm_bindgen(getter, js_name = normalBuffer)]
    pub fn normal_buffer(&self) -> WebGlBuffer {
        self.normals.clone()
    }

    #[wasm_bindgen(getter, js_name = texCoordBuffer)]
    pub fn tex_coord_buffer(&self) -> WebGlBuffer {
        self.tex_coords.clone()
    }

    #[wasm_bindgen(getter, js_name = indexBuffer)]
    pub fn index_buffer(&self) -> WebGlBuffer {
        self.indices.clone()
    }

    /// Element count for `drawElements` with `UNSIGNED_INT` indices
    #[wasm_bindgen(getter, js_name = indexCount)]
    pub fn index_count(&self) -> usize {
        self.index_count
    }
}

impl IcoSphereModel {
    pub fn from_geometry(gl: &Gl, geometry: &IcoSphereGeometry) -> Result<Self, JsValue> {
        let model = Self {
            positions: create_buffer(gl, Gl::ARRAY_BUFFER, &f32_bytes(geometry.positions()))?,
            normals: create_buffer(gl, Gl::ARRAY_BUFFER, &f32_bytes(geometry.normals()))?,
            tex_coords: create_buffer(gl, Gl::ARRAY_BUFFER, &f32_bytes(geometry.tex_coords()))?,
            indices: create_buffer(gl, Gl::ELEMENT_ARRAY_BUFFER, &u32_bytes(geometry.indices()))?,
            index_count: geometry.indices().len(),
        };
        info!("Created WebGL buffers for {}", geometry);
        Ok(model)
    }
}

/// Look up a canvas by id and get its WebGL2 context
#[wasm_bindgen(js_name = contextForCanvas)]
pub fn context_for_canvas(canvas_id: &str) -> Result<Gl, JsValue> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("No document available"))?;
    let canvas = document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| JsValue::from_str(&format!("No element with id '{}'", canvas_id)))?
        .dyn_into::<HtmlCanvasElement>()?;
    let context = canvas
        .get_context("webgl2")?
        .ok_or_else(|| JsValue::from_str("WebGL2 is not supported"))?
        .dyn_into::<Gl>()?;
    Ok(context)
}

/// Warn about an exception thrown by `onVertexAdded`. Returns whether one was thrown.
fn log_callback_failure<T, E: std::fmt::Debug>(index: u32, result: Result<T, E>) -> bool {
    match result {
        Ok(_) => false,
        Err(e) => {
            warn!("onVertexAdded threw for vertex {}: {:?}", index, e);
            true
        }
    }
}

fn create_buffer(gl: &Gl, target: u32, bytes: &[u8]) -> Result<WebGlBuffer, JsValue> {
    let buffer = gl
        .create_buffer()
        .ok_or_else(|| JsValue::from_str("Failed to create WebGL buffer"))?;
    gl.bind_buffer(target, Some(&buffer));
    gl.buffer_data_with_u8_array(target, bytes, Gl::STATIC_DRAW);
    gl.bind_buffer(target, None);
    Ok(buffer)
}

/// Pack floats as little-endian bytes, the layout WebGL reads on wasm32
pub fn f32_bytes(data: &[f32]) -> Vec<u8> {
    data.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Pack indices as little-endian bytes for `UNSIGNED_INT` element buffers
pub fn u32_bytes(data: &[u32]) -> Vec<u8> {
    data.iter().flat_map(|v| v.to_le_bytes()).collect()
}
