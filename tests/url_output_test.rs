// Expanded templates are well-formed URLs

use url::Url;
use uritemplate::expand;

mod common;

#[test]
fn test_expansions_parse_as_urls() {
    let data = common::rfc_data();
    let templates = [
        "http://example.com/{var}{/list*}{?keys*}",
        "http://example.com{+path}{?hello,half}{#who}",
        "https://example.com/search{?count*}{&x,y,empty}",
        "http://example.com/{;list*}/{dub}",
    ];
    for template in templates {
        let uri = expand(template, &data).unwrap();
        assert!(Url::parse(&uri).is_ok(), "{:?} expanded to invalid URL {:?}", template, uri);
    }
}

#[test]
fn test_query_pairs_round_trip() {
    let data = common::rfc_data();
    let uri = expand("http://example.com/{?hello,half,keys*}", &data).unwrap();
    let url = Url::parse(&uri).unwrap();
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    assert_eq!(
        pairs,
        vec![
            ("hello".to_string(), "Hello World!".to_string()),
            ("half".to_string(), "50%".to_string()),
            ("semi".to_string(), ";".to_string()),
            ("dot".to_string(), ".".to_string()),
            ("comma".to_string(), ",".to_string()),
        ]
    );
}
