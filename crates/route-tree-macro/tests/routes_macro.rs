//! Tests for the `routes!` macro as seen from a downstream crate.

use route_tree_macro::routes;

const APP_ROUTES: &str = routes! {
    "/" => const Shell,
    "/home" => const Home,
    "/home/settings" as settings => Settings,
};

#[test]
fn expands_in_const_position() {
    assert_eq!(
        APP_ROUTES,
        concat!(
            "[ { path: \"/\", construct: const Shell(), routes: [ ",
            "{ path: \"/home\", construct: const Home(), routes: [ ",
            "{ path: \"/settings\", name: \"settings\", construct: Settings() }",
            " ] } ] } ]",
        )
    );
}

#[test]
fn without_root_each_top_level_route_is_listed() {
    let config = routes! {
        "/inbox" as inbox => Inbox,
        "/inbox/:id" => const Message,
        "/archive" => Archive,
    };

    assert_eq!(
        config,
        concat!(
            "[ { path: \"/inbox\", name: \"inbox\", construct: Inbox(), routes: [ ",
            "{ path: \"/:id\", construct: const Message() } ] }, ",
            "{ path: \"/archive\", construct: Archive() } ]",
        )
    );
}

#[test]
fn trailing_comma_is_optional() {
    let with = routes! { "/a" => A, };
    let without = routes! { "/a" => A };
    assert_eq!(with, without);
}

#[test]
fn orphans_are_left_out() {
    let config = routes! {
        "/a" => A,
        "/b/c" => Orphan,
    };
    assert!(!config.contains("Orphan"));
}
