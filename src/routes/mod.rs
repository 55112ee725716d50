//! Routers de la API
//!
//! Un router por recurso, estilo MVC. La identidad del actor para la
//! atribución de auditoría (dispatched_by / logged_by) llega en la cabecera
//! `x-user-id`; la autenticación real es un colaborador externo.

pub mod driver_routes;
pub mod maintenance_routes;
pub mod trip_routes;
pub mod vehicle_routes;

use axum::http::HeaderMap;
use uuid::Uuid;

/// Extraer el id del actor autenticado de las cabeceras
pub fn actor_id(headers: &HeaderMap) -> Uuid {
    headers
        .get("x-user-id")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value).ok())
        .unwrap_or_else(Uuid::nil)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_actor_id_from_header() {
        let mut headers = HeaderMap::new();
        let id = Uuid::new_v4();
        headers.insert("x-user-id", HeaderValue::from_str(&id.to_string()).unwrap());
        assert_eq!(actor_id(&headers), id);
    }

    #[test]
    fn test_actor_id_defaults_to_nil() {
        let headers = HeaderMap::new();
        assert_eq!(actor_id(&headers), Uuid::nil());

        let mut headers = HeaderMap::new();
        headers.insert("x-user-id", HeaderValue::from_static("not-a-uuid"));
        assert_eq!(actor_id(&headers), Uuid::nil());
    }
}
