// Mock interview core: script, per-session state, the store that holds it,
// the model-backed assessor, and the stage machine that ties them together.

pub mod assessor;
pub mod engine;
pub mod handlers;
pub mod prompts;
pub mod script;
pub mod session;
pub mod store;
