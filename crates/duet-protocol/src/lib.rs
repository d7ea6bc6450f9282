//! Minimal wire envelope kept for the demo gateway's `/health` surface.
//! Trimmed from a much larger admin/WS protocol (connect handshake, auth
//! modes, method dispatch table) that has no counterpart once the gateway
//! is HTTP-only — see DESIGN.md's final trim pass.

pub mod frames;

pub use frames::HealthFrame;
