//! # kinecursor
//!
//! Drive the system pointer with a depth sensor: reach a hand toward the
//! sensor to steer the cursor, close it into a fist to hold the primary
//! button, open it to let go.
//!
//! ## Gesture → action mapping
//!
//! | Gesture | Hand | Action |
//! |---|---|---|
//! | Hand pushed ~30 cm in front of the shoulders | Right (preferred) or Left | Arm tracking, cursor follows the hand |
//! | Close the armed hand into a fist | Active | Primary button down |
//! | Open the fist | Active | Primary button up |
//! | Drop the hand back | Active | Disarm; the cursor stays where it was |
//!
//! ## Feature flags
//!
//! * (default): cursor output is logged only.
//! * `os-input`: moves the real pointer through `enigo`.
//!
//! ### Simulation controls
//!
//! The bundled sensor is simulated from the viewer window.
//!
//! | Input | Effect |
//! |---|---|
//! | Mouse pointer | Where the reaching hand points |
//! | `R` held | Reach out with the right hand |
//! | `L` held | Reach out with the left hand |
//! | `Space` held / left click | Close the hand into a fist |
//! | `D` | Drop the next depth frame |
//! | `X` | Reset the session, as after a sensor restart |
//! | `Q` / `Escape` | Quit |

pub mod sim;
pub mod output;
pub mod viewer;
pub mod app;
