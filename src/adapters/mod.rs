// Adapters layer: concrete implementations of the collaborator ports (auth service over HTTP).

pub mod supabase;

pub use supabase::{SupabaseAuthClient, SupabaseSessionProvider, DEFAULT_SESSION_COOKIE};
