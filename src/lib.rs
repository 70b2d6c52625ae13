mod color;
mod field;
mod options;
mod particle;
mod pointer;
mod renderer;
mod utils;

pub use crate::color::{Color, Theme};
pub use crate::field::{approach_angle, ParticleField};
pub use crate::options::{FieldMode, FieldOptions, StepPolicy};
pub use crate::particle::Particle;
pub use crate::pointer::PointerTracker;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent};

use crate::renderer::CanvasPainter;

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen]
pub fn initialize() {
    utils::set_panic_hook();
}

pub struct Timer<'a> {
    name: &'a str,
}

impl<'a> Timer<'a> {
    pub fn new(name: &'a str) -> Timer<'a> {
        console::time_with_label(name);
        Timer { name }
    }
}

impl<'a> Drop for Timer<'a> {
    fn drop(&mut self) {
        console::time_end_with_label(self.name);
    }
}

/// Viewport width below which the stationary profile is used even on
/// pointer devices.
const NARROW_VIEWPORT: f64 = 768.0;

/// Everything one running field owns. Lives behind a shared `Rc` so the
/// event handlers and the frame callback all mutate the same instance;
/// nothing is module-level, so separate `CursorField`s never interfere.
struct FieldState {
    field: ParticleField,
    tracker: PointerTracker,
    painter: Option<CanvasPainter>,
    canvas: HtmlCanvasElement,
    theme: Theme,
    mode: FieldMode,
    running: bool,
    frame_handle: Option<i32>,
}

impl FieldState {
    /// One animation frame: settle the smoothed pointer, advance the
    /// simulation, repaint.
    fn frame_tick(&mut self) {
        self.tracker.settle();
        self.field.step(self.tracker.current);
        if let Some(painter) = &self.painter {
            painter.clear();
            // Drawing is cosmetic; a failed canvas call just skips the frame.
            let _ = painter.draw(self.field.iter(), self.theme);
        }
    }
}

struct Listeners {
    mouse_move: Closure<dyn FnMut(MouseEvent)>,
    mouse_leave: Closure<dyn FnMut(MouseEvent)>,
    resize: Closure<dyn FnMut()>,
}

/// Cell holding the self-rescheduling frame closure. The closure keeps a
/// handle to its own cell; emptying the cell from either side breaks the
/// cycle and frees the closure.
type FrameCell = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// The cursor particle overlay exported to the page. The host creates a
/// full-viewport, input-transparent canvas, attaches a field to it, and
/// calls `start` on mount and `stop` on unmount.
#[wasm_bindgen]
pub struct CursorField {
    state: Rc<RefCell<FieldState>>,
    listeners: Option<Listeners>,
    frame: FrameCell,
}

#[wasm_bindgen]
impl CursorField {
    /// Size the canvas to the viewport and build a field for it. Never
    /// errors: if the 2D context can't be obtained the field is inert and
    /// `start` does nothing.
    pub fn attach(canvas: HtmlCanvasElement, dark_theme: bool) -> CursorField {
        let _timer = Timer::new("CursorField::attach");
        let (width, height) =
            viewport_size().unwrap_or((canvas.width() as f64, canvas.height() as f64));
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);

        let painter = canvas
            .get_context("2d")
            .ok()
            .and_then(|ctx| ctx)
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
            .map(|ctx| CanvasPainter::new(ctx, width, height));

        let mode = detect_mode(width);
        let options = FieldOptions::for_mode(mode);
        let theme = if dark_theme { Theme::Dark } else { Theme::Light };

        let state = FieldState {
            field: ParticleField::new(width, height, mode, options),
            tracker: PointerTracker::new(width, height, options.smoothing),
            painter,
            canvas,
            theme,
            mode,
            running: false,
            frame_handle: None,
        };
        CursorField {
            state: Rc::new(RefCell::new(state)),
            listeners: None,
            frame: Rc::new(RefCell::new(None)),
        }
    }

    /// Attach the pointer and resize listeners and begin the animation
    /// loop. A no-op if the field is already running or has no context.
    pub fn start(&mut self) {
        if self.listeners.is_some() {
            return;
        }
        {
            let mut state = self.state.borrow_mut();
            if state.running || state.painter.is_none() {
                return;
            }
            state.running = true;
            if state.mode == FieldMode::Stationary {
                let mut rng = rand::thread_rng();
                state.field.seed(&mut rng);
            }
        }
        match attach_listeners(&self.state) {
            Some(listeners) => {
                self.listeners = Some(listeners);
                schedule_frames(self.state.clone(), self.frame.clone());
            }
            None => {
                self.state.borrow_mut().running = false;
            }
        }
    }

    /// Cancel the pending frame, detach every listener, and release the
    /// particle collection. Safe to call any number of times.
    pub fn stop(&mut self) {
        {
            let mut state = self.state.borrow_mut();
            state.running = false;
            if let Some(handle) = state.frame_handle.take() {
                if let Some(window) = web_sys::window() {
                    let _ = window.cancel_animation_frame(handle);
                }
            }
            state.field.clear();
        }
        // The cancelled frame will never fire again to clear its own cell,
        // so release the closure (and the state it captures) here.
        let _ = self.frame.borrow_mut().take();
        if let Some(listeners) = self.listeners.take() {
            if let Some(window) = web_sys::window() {
                if let Some(document) = window.document() {
                    detach_listeners(&window, &document, &listeners);
                }
            }
        }
    }

    pub fn set_theme(&mut self, dark_theme: bool) {
        self.state.borrow_mut().theme = if dark_theme { Theme::Dark } else { Theme::Light };
    }

    pub fn is_running(&self) -> bool {
        self.state.borrow().running
    }

    pub fn particle_count(&self) -> usize {
        self.state.borrow().field.len()
    }
}

fn viewport_size() -> Option<(f64, f64)> {
    let window = web_sys::window()?;
    let width = window.inner_width().ok()?.as_f64()?;
    let height = window.inner_height().ok()?.as_f64()?;
    Some((width, height))
}

/// Decided once at attach time; the per-frame step never re-checks the
/// environment.
fn detect_mode(viewport_width: f64) -> FieldMode {
    let touch = web_sys::window()
        .map(|window| window.navigator().max_touch_points() > 0)
        .unwrap_or(false);
    if touch || viewport_width < NARROW_VIEWPORT {
        FieldMode::Stationary
    } else {
        FieldMode::PointerFollowing
    }
}

fn attach_listeners(state: &Rc<RefCell<FieldState>>) -> Option<Listeners> {
    let window = web_sys::window()?;
    let document = window.document()?;

    let move_state = state.clone();
    let mouse_move = Closure::wrap(Box::new(move |event: MouseEvent| {
        let mut state = move_state.borrow_mut();
        let x = event.client_x() as f64;
        let y = event.client_y() as f64;
        state.tracker.retarget(x, y);
        if state.mode == FieldMode::PointerFollowing {
            let mut rng = rand::thread_rng();
            state.field.pointer_moved_spawn(x, y, &mut rng);
        }
    }) as Box<dyn FnMut(MouseEvent)>);

    let leave_state = state.clone();
    let mouse_leave = Closure::wrap(Box::new(move |_event: MouseEvent| {
        leave_state.borrow_mut().field.fade_out();
    }) as Box<dyn FnMut(MouseEvent)>);

    let resize_state = state.clone();
    let resize = Closure::wrap(Box::new(move || {
        let _timer = Timer::new("CursorField::resize");
        if let Some((width, height)) = viewport_size() {
            let mut state = resize_state.borrow_mut();
            state.canvas.set_width(width as u32);
            state.canvas.set_height(height as u32);
            state.field.resize(width, height);
            if let Some(painter) = &mut state.painter {
                painter.resize(width, height);
            }
        }
    }) as Box<dyn FnMut()>);

    let listeners = Listeners {
        mouse_move,
        mouse_leave,
        resize,
    };

    let attached = document
        .add_event_listener_with_callback(
            "mousemove",
            listeners.mouse_move.as_ref().unchecked_ref(),
        )
        .is_ok()
        && document
            .add_event_listener_with_callback(
                "mouseleave",
                listeners.mouse_leave.as_ref().unchecked_ref(),
            )
            .is_ok()
        && window
            .add_event_listener_with_callback("resize", listeners.resize.as_ref().unchecked_ref())
            .is_ok();

    if attached {
        Some(listeners)
    } else {
        // A closure must not outlive its registration; unwind whatever
        // half of the set did get attached.
        detach_listeners(&window, &document, &listeners);
        None
    }
}

fn detach_listeners(window: &web_sys::Window, document: &web_sys::Document, listeners: &Listeners) {
    let _ = document.remove_event_listener_with_callback(
        "mousemove",
        listeners.mouse_move.as_ref().unchecked_ref(),
    );
    let _ = document.remove_event_listener_with_callback(
        "mouseleave",
        listeners.mouse_leave.as_ref().unchecked_ref(),
    );
    let _ = window
        .remove_event_listener_with_callback("resize", listeners.resize.as_ref().unchecked_ref());
}

fn request_frame(callback: &Closure<dyn FnMut()>) -> Option<i32> {
    web_sys::window()?
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .ok()
}

/// The self-rescheduling animation-frame loop. The closure lives in the
/// field's frame cell: a frame that observes a stopped field (or a failed
/// reschedule) takes itself out, and `stop()` empties the cell for frames
/// it cancelled before they could run.
fn schedule_frames(state: Rc<RefCell<FieldState>>, callback: FrameCell) {
    let handle = callback.clone();
    let frame_state = state.clone();
    *callback.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let next = {
            let mut state = frame_state.borrow_mut();
            if !state.running {
                // stop() won the race with an already-dispatched frame.
                None
            } else {
                state.frame_tick();
                let next = handle.borrow().as_ref().and_then(request_frame);
                state.frame_handle = next;
                next
            }
        };
        if next.is_none() {
            let _ = handle.borrow_mut().take();
        }
    }) as Box<dyn FnMut()>));

    let first = callback.borrow().as_ref().and_then(request_frame);
    match first {
        Some(first_handle) => state.borrow_mut().frame_handle = Some(first_handle),
        None => {
            let _ = callback.borrow_mut().take();
        }
    }
}
