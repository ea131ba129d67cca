use axum::http::Method;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    FetchOne,
    FetchAll,
    Create,
    Update,
    Delete,
}

/// One entry of the dispatch table: when `matches` holds for the request's
/// method and optional path id, `operation` runs.
pub struct Route {
    pub name: &'static str,
    pub matches: fn(&Method, Option<&str>) -> bool,
    pub operation: Operation,
}

fn get_with_id(method: &Method, id: Option<&str>) -> bool {
    id.is_some() && *method == Method::GET
}

fn put_with_id(method: &Method, id: Option<&str>) -> bool {
    id.is_some() && *method == Method::PUT
}

fn delete_with_id(method: &Method, id: Option<&str>) -> bool {
    id.is_some() && *method == Method::DELETE
}

fn post(method: &Method, _: Option<&str>) -> bool {
    *method == Method::POST
}

fn get(method: &Method, _: Option<&str>) -> bool {
    *method == Method::GET
}

fn any(_: &Method, _: Option<&str>) -> bool {
    true
}

/// Evaluated top to bottom, first match wins.
pub const ROUTES: &[Route] = &[
    Route {
        name: "get-one",
        matches: get_with_id,
        operation: Operation::FetchOne,
    },
    Route {
        name: "update",
        matches: put_with_id,
        operation: Operation::Update,
    },
    Route {
        name: "delete",
        matches: delete_with_id,
        operation: Operation::Delete,
    },
    Route {
        name: "create",
        matches: post,
        operation: Operation::Create,
    },
    Route {
        name: "get-all",
        matches: get,
        operation: Operation::FetchAll,
    },
];

/// Taken when nothing in [`ROUTES`] matches (e.g. PUT or DELETE without an id).
pub static FALLBACK: Route = Route {
    name: "fallback",
    matches: any,
    operation: Operation::FetchAll,
};

pub fn resolve(method: &Method, id: Option<&str>) -> &'static Route {
    ROUTES
        .iter()
        .find(|route| (route.matches)(method, id))
        .unwrap_or(&FALLBACK)
}

pub fn is_fallback(route: &Route) -> bool {
    std::ptr::eq(route, &FALLBACK)
}

/// Extracts `:id` from `/<route>/:id`. Any other path shape carries no id.
pub fn order_id<'a>(path: &'a str, route: &str) -> Option<&'a str> {
    let id = path
        .strip_prefix('/')?
        .strip_prefix(route)?
        .strip_prefix('/')?;
    (!id.is_empty() && !id.contains('/')).then_some(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(method: Method, id: Option<&str>) -> Operation {
        resolve(&method, id).operation
    }

    #[test]
    fn routes_with_id() {
        assert_eq!(op(Method::GET, Some("a")), Operation::FetchOne);
        assert_eq!(op(Method::PUT, Some("a")), Operation::Update);
        assert_eq!(op(Method::DELETE, Some("a")), Operation::Delete);
        // POST ignores the id.
        assert_eq!(op(Method::POST, Some("a")), Operation::Create);
    }

    #[test]
    fn routes_without_id() {
        assert_eq!(op(Method::POST, None), Operation::Create);
        assert_eq!(op(Method::GET, None), Operation::FetchAll);
        assert!(!is_fallback(resolve(&Method::GET, None)));
    }

    #[test]
    fn unmatched_requests_fall_back_to_listing() {
        for method in [Method::PUT, Method::DELETE, Method::PATCH] {
            let route = resolve(&method, None);
            assert!(is_fallback(route), "{method} should fall back");
            assert_eq!(route.operation, Operation::FetchAll);
        }
        assert!(is_fallback(resolve(&Method::PATCH, Some("a"))));
    }

    #[test]
    fn id_is_one_segment_after_route() {
        assert_eq!(order_id("/restful-tasks/abc123", "restful-tasks"), Some("abc123"));
        assert_eq!(order_id("/restful-tasks", "restful-tasks"), None);
        assert_eq!(order_id("/restful-tasks/", "restful-tasks"), None);
        assert_eq!(order_id("/restful-tasks/a/b", "restful-tasks"), None);
        assert_eq!(order_id("/restful-tasksx/a", "restful-tasks"), None);
        assert_eq!(order_id("/other/a", "restful-tasks"), None);
    }
}
