// Common test fixtures shared across test files

use std::collections::HashMap;

use uritemplate::Variable;

pub struct Keys {
    pub semi: String,
    pub dot: String,
    pub comma: String,
}

uritemplate::record!(Keys { semi, dot, comma });

#[allow(dead_code)]
pub fn keys() -> Keys {
    Keys {
        semi: ";".to_string(),
        dot: ".".to_string(),
        comma: ",".to_string(),
    }
}

pub type Data = HashMap<&'static str, Box<dyn Variable>>;

/// The variable set used by the RFC 6570 section 3.2 examples.
#[allow(dead_code)]
pub fn rfc_data() -> Data {
    let mut data: Data = HashMap::new();
    data.insert("count", Box::new(vec!["one", "two", "three"]));
    data.insert("dom", Box::new(vec!["example", "com"]));
    data.insert("dub", Box::new("me/too"));
    data.insert("hello", Box::new("Hello World!"));
    data.insert("half", Box::new("50%"));
    data.insert("var", Box::new("value"));
    data.insert("who", Box::new("fred"));
    data.insert("base", Box::new("http://example.com/home/"));
    data.insert("path", Box::new("/foo/bar"));
    data.insert("list", Box::new(vec!["red", "green", "blue"]));
    data.insert("keys", Box::new(keys()));
    data.insert("v", Box::new("6"));
    data.insert("x", Box::new("1024"));
    data.insert("y", Box::new("768"));
    data.insert("empty", Box::new(""));
    data.insert("empty_keys", Box::new(HashMap::<String, String>::new()));
    data.insert("undef", Box::new(None::<String>));
    data
}

/// Expand every `(template, want)` pair, collecting mismatches into one failure.
#[allow(dead_code)]
pub fn assert_expansions<D: Variable + ?Sized>(data: &D, cases: &[(&str, &str)]) {
    let failures: Vec<String> = cases
        .iter()
        .filter_map(|(template, want)| match uritemplate::expand(template, data) {
            Ok(got) if got == *want => None,
            Ok(got) => Some(format!("{:?}: got {:?}, want {:?}", template, got, want)),
            Err(err) => Some(format!("{:?}: unexpected error {}", template, err)),
        })
        .collect();
    assert!(failures.is_empty(), "Expansion mismatches:\n{}", failures.join("\n"));
}
