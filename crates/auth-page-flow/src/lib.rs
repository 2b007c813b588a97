//! Authentication page flow.
//!
//! This crate provides:
//! - A declarative state machine over the five authentication screens
//! - [`AuthPageFlow`], which pairs the machine with the email address
//!   waiting for OTP confirmation

mod error;
mod flow;
mod page_fsm;

pub use error::{FlowError, FlowResult};
pub use flow::AuthPageFlow;
pub use page_fsm::page_machine;
pub use page_fsm::{AuthPage, PageMachine, PageMachineInput, PageMachineState};
