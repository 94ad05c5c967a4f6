pub mod evento;
pub mod perfil;
pub mod social;

pub use evento::{Evento, EventoFavorito};
pub use perfil::{ContadoresPerfil, Perfil};
pub use social::{Seguidor, UserSummary};
