#[macro_export]
macro_rules! authorization_endpoint {
    ( $( $x: expr),+ ) => {{
        format!("https://accounts.spotify.com{}", format_args!($($x),+))
    }};
}

#[macro_export]
macro_rules! api_endpoint {
    ( $( $x: expr),+ ) => {{
        format!("https://api.spotify.com/v1{}", format_args!($($x),+))
    }};
}

#[macro_export]
macro_rules! lastfm_endpoint {
    ( $( $x: expr),+ ) => {{
        format!("https://ws.audioscrobbler.com/2.0{}", format_args!($($x),+))
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn endpoints_interpolate_arguments() {
        let id = "abc";
        assert_eq!(
            api_endpoint!("/artists/{id}"),
            "https://api.spotify.com/v1/artists/abc"
        );
        assert_eq!(
            authorization_endpoint!("/api/token"),
            "https://accounts.spotify.com/api/token"
        );
        assert_eq!(lastfm_endpoint!("/"), "https://ws.audioscrobbler.com/2.0/");
    }
}
