use axum::response::Redirect;

/// Build a redirect whose query string carries the toast parameters
/// (`msg`, `desc`, `error`, `field`) the next page consumes
pub fn redirect_with_params(path: &str, params: &[(&str, &str)]) -> Redirect {
    if params.is_empty() {
        return Redirect::to(path);
    }

    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in params {
        serializer.append_pair(key, value);
    }
    let target = format!("{}?{}", path, serializer.finish());
    Redirect::to(&target)
}

/// Map the auth service's sign-up error message onto the user-facing
/// message and the form field it belongs to. The service reports errors
/// as prose, so this is substring matching by necessity.
pub fn map_signup_error(backend_message: &str) -> (&'static str, Option<&'static str>) {
    if backend_message.contains("User already registered") {
        ("El correo electrónico ya está registrado", Some("email"))
    } else if backend_message.contains("Password should be at least") {
        ("La contraseña no cumple con los requisitos mínimos", Some("password"))
    } else if backend_message.contains("Invalid email") {
        ("El formato del correo electrónico no es válido", Some("email"))
    } else if backend_message.contains("Signup is disabled") {
        ("El registro de usuarios está temporalmente deshabilitado", None)
    } else {
        ("Error en el registro", None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_signup_errors_to_fields() {
        assert_eq!(
            map_signup_error("User already registered"),
            ("El correo electrónico ya está registrado", Some("email"))
        );
        assert_eq!(
            map_signup_error("Password should be at least 6 characters"),
            ("La contraseña no cumple con los requisitos mínimos", Some("password"))
        );
        assert_eq!(map_signup_error("something else entirely"), ("Error en el registro", None));
    }
}
