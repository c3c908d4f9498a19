/// Relays game-state transitions to the MSAgent-AI companion.
///
/// A host plugin owns one [`script::Script`], forwards raw keyboard messages
/// to its [`keyboard::KeyStates`], and calls [`script::Script::tick`] once per
/// frame with an implementation of [`host::HostQuery`].
pub mod channel;
pub mod config;
pub mod engine;
pub mod host;
pub mod keyboard;
pub mod lookup;
pub mod menu;
pub mod overlay;
pub mod paths;
pub mod replay;
pub mod script;
pub mod settings;
pub mod snapshot;
