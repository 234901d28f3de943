//! Query key → media query expansion against the bootstrap breakpoint set.

use std::any::Any;

use pretty_assertions::assert_eq;
use regex::RegexBuilder;
use resp_style_attr::{
    CompilerConfig, FeatureRegistry, MediaQueryCompiler, MediaQueryDescriptor, StyleCompiler,
};

const USER_AGENT: &str = "Mozilla/5.0 (Linux; Android 11; SM-A102U) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/89.0.4389.72 Mobile Safari/537.36";

fn bootstrap_config() -> CompilerConfig {
    CompilerConfig {
        seed: Some(1),
        ..CompilerConfig::with_breakpoints([
            ("xs", "0"),
            ("sm", "576px"),
            ("md", "768px"),
            ("lg", "992px"),
            ("xl", "1200px"),
            ("xxl", "1400px"),
        ])
    }
}

fn ua_matches(pattern: &str) -> bool {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map(|re| re.is_match(USER_AGENT))
        .unwrap_or(false)
}

fn test_features() -> FeatureRegistry {
    type Ctx<'a> = Option<&'a dyn Any>;

    let mut features = FeatureRegistry::new();
    features
        .register("alwaysTrue", |d: &mut MediaQueryDescriptor, _: &str, _: &str, _: Ctx| {
            d.set_media("all")
        })
        .register("alwaysFalse", |d: &mut MediaQueryDescriptor, _: &str, _: &str, _: Ctx| {
            d.set_media("none")
        })
        .register("simpleValue", |d: &mut MediaQueryDescriptor, arg: &str, _: &str, _: Ctx| {
            d.set("simple-value", arg)
        })
        .register("complexValue", |d: &mut MediaQueryDescriptor, arg: &str, _: &str, _: Ctx| {
            let sum: f64 = arg
                .split(',')
                .filter_map(|v| v.trim().parse::<f64>().ok())
                .sum();
            d.set("complex-value", sum.to_string())
        })
        .register("androidOnly", |d: &mut MediaQueryDescriptor, _: &str, _: &str, _: Ctx| {
            if !ua_matches("android") {
                d.set_media("none")
            }
        })
        .register("uaMustMatch", |d: &mut MediaQueryDescriptor, arg: &str, _: &str, _: Ctx| {
            if !ua_matches(arg) {
                d.set_media("none")
            }
        })
        .register("wkmdpr", |d: &mut MediaQueryDescriptor, arg: &str, _: &str, _: Ctx| {
            d.set("-webkit-min-device-pixel-ratio", arg)
        })
        .register("keyValue", |d: &mut MediaQueryDescriptor, arg: &str, _: &str, _: Ctx| {
            if let Some((key, value)) = arg.split_once(',') {
                d.set(key, value)
            }
        })
        .register("set", |d: &mut MediaQueryDescriptor, arg: &str, _: &str, _: Ctx| {
            d.set_flag(arg, true)
        })
        .register("unset", |d: &mut MediaQueryDescriptor, arg: &str, _: &str, _: Ctx| {
            d.set_flag(arg, false)
        });
    features
}

#[test]
fn expands_keys() {
    let mut compiler = MediaQueryCompiler::from_config(&bootstrap_config(), test_features());

    let cases = [
        ("lt-md", "@media all and (max-width: 767.98px)"),
        ("lte-md", "@media all and (max-width: 768px)"),
        ("gt-md", "@media all and (min-width: 768px)"),
        ("gte-md", "@media all and (min-width: 767.98px)"),
        ("lt-500px", "@media all and (max-width: 499.98px)"),
        ("lte-500px", "@media all and (max-width: 500px)"),
        ("gt-600px", "@media all and (min-width: 600px)"),
        ("gte-600px", "@media all and (min-width: 599.98px)"),
        ("xs", "@media all and (min-width: 0) and (max-width: 575.98px)"),
        ("sm", "@media all and (min-width: 576px) and (max-width: 767.98px)"),
        ("md", "@media all and (min-width: 768px) and (max-width: 991.98px)"),
        ("lg", "@media all and (min-width: 992px) and (max-width: 1199.98px)"),
        ("xl", "@media all and (min-width: 1200px) and (max-width: 1399.98px)"),
        ("xxl", "@media all and (min-width: 1400px)"),
        (
            "md@portrait",
            "@media all and (min-width: 768px) and (max-width: 991.98px) \
             and (orientation: portrait)",
        ),
        (
            "md@ portrait ",
            "@media all and (min-width: 768px) and (max-width: 991.98px) \
             and (orientation: portrait)",
        ),
        (
            "md@landscape",
            "@media all and (min-width: 768px) and (max-width: 991.98px) \
             and (orientation: landscape)",
        ),
        (
            "md@  landscape    ",
            "@media all and (min-width: 768px) and (max-width: 991.98px) \
             and (orientation: landscape)",
        ),
        ("md ", "@media all and (min-width: 768px) and (max-width: 991.98px)"),
        ("     md", "@media all and (min-width: 768px) and (max-width: 991.98px)"),
        ("     @md@", "@media all and (min-width: 768px) and (max-width: 991.98px)"),
        ("   @@@@md@md ", "@media all and (min-width: 768px) and (max-width: 991.98px)"),
        (
            "   @@md@  @ landscape ",
            "@media all and (min-width: 768px) and (max-width: 991.98px) \
             and (orientation: landscape)",
        ),
        (
            "screen   @@md@  @ landscape ",
            "@media screen and (min-width: 768px) and (max-width: 991.98px) \
             and (orientation: landscape)",
        ),
        ("screen@md", "@media screen and (min-width: 768px) and (max-width: 991.98px)"),
        (
            "screen@md@portrait",
            "@media screen and (min-width: 768px) and (max-width: 991.98px) \
             and (orientation: portrait)",
        ),
        ("xs-to-sm", "@media all and (min-width: 0) and (max-width: 575.98px)"),
        ("sm-to-md", "@media all and (min-width: 576px) and (max-width: 767.98px)"),
        ("md-to-lg", "@media all and (min-width: 768px) and (max-width: 991.98px)"),
        ("lg-to-xl", "@media all and (min-width: 992px) and (max-width: 1199.98px)"),
        ("xl-to-xxl", "@media all and (min-width: 1200px) and (max-width: 1399.98px)"),
        ("xxl-to-GARBLED", "@media all"),
        ("xs-to-md", "@media all and (min-width: 0) and (max-width: 767.98px)"),
        ("sm-to-xl", "@media all and (min-width: 576px) and (max-width: 1199.98px)"),
        ("md-to-xxl", "@media all and (min-width: 768px) and (max-width: 1399.98px)"),
        ("xs-down", "@media all and (max-width: -0.02)"),
        ("sm-down", "@media all and (max-width: 575.98px)"),
        ("md-down", "@media all and (max-width: 767.98px)"),
        ("lg-down", "@media all and (max-width: 991.98px)"),
        ("xl-down", "@media all and (max-width: 1199.98px)"),
        ("xxl-down", "@media all and (max-width: 1399.98px)"),
        ("xs-up", "@media all and (min-width: 0)"),
        ("sm-up", "@media all and (min-width: 576px)"),
        ("md-up", "@media all and (min-width: 768px)"),
        ("lg-up", "@media all and (min-width: 992px)"),
        ("xl-up", "@media all and (min-width: 1200px)"),
        ("xxl-up", "@media all and (min-width: 1400px)"),
        ("1000px", "@media all and (min-width: 1000px)"),
        ("1000px-up", "@media all and (min-width: 1000px)"),
        ("1000px-down", "@media all and (max-width: 999.98px)"),
        ("500px-to-666px", "@media all and (min-width: 500px) and (max-width: 665.98px)"),
        ("600px-to-800px", "@media all and (min-width: 600px) and (max-width: 799.98px)"),
        ("lg-to-1680px", "@media all and (min-width: 992px) and (max-width: 1679.98px)"),
        (
            "255px-to-500px@portrait",
            "@media all and (min-width: 255px) and (max-width: 499.98px) \
             and (orientation: portrait)",
        ),
        ("255px-to-lg", "@media all and (min-width: 255px) and (max-width: 991.98px)"),
        ("landscape", "@media all and (orientation: landscape)"),
        (
            "@screen, print@sm-up@landscape",
            "@media screen, print and (min-width: 576px) and (orientation: landscape)",
        ),
        (
            "@not screen, print@sm-up@landscape",
            "@media not screen, print and (min-width: 576px) and (orientation: landscape)",
        ),
        (
            "@not screen, print@xxl@landscape",
            "@media not screen, print and (min-width: 1400px) and (orientation: landscape)",
        ),
        ("@xs", "@media all and (min-width: 0) and (max-width: 575.98px)"),
        ("@print,screen@xs", "@media print,screen and (min-width: 0) and (max-width: 575.98px)"),
        ("1000px@simpleValue(2)", "@media all and (min-width: 1000px) and (simple-value: 2)"),
        ("1000px@alwaysTrue", "@media all and (min-width: 1000px)"),
        ("1000px@alwaysFalse", "@media none and (min-width: 1000px)"),
        (
            "1000px@complexValue(1,2,3,4)",
            "@media all and (min-width: 1000px) and (complex-value: 10)",
        ),
        ("1000px@non-existing(1,2,3,4)", "@media all and (min-width: 1000px)"),
        ("1000px@androidOnly", "@media all and (min-width: 1000px)"),
        ("1000px@uaMustMatch(android)", "@media all and (min-width: 1000px)"),
        ("1000px@uaMustMatch(ios)", "@media none and (min-width: 1000px)"),
        ("wkmdpr(2)", "@media all and (-webkit-min-device-pixel-ratio: 2)"),
        ("keyValue(min-resolution,2dppx)", "@media all and (min-resolution: 2dppx)"),
        ("set(prefers-reduced-motion)", "@media all and (prefers-reduced-motion)"),
        ("unset(prefers-reduced-motion)", "@media all"),
        (
            "set(prefers-reduced-motion)@,@set(prefers-reduced-data)",
            "@media all and (prefers-reduced-motion), all and (prefers-reduced-data)",
        ),
        (
            "keyValue(-webkit-min-device-pixel-ratio,2)@,@keyValue(min-resolution,2dppx)",
            "@media all and (-webkit-min-device-pixel-ratio: 2), all and (min-resolution: 2dppx)",
        ),
        ("(prefers-reduced-motion)", "@media all and (prefers-reduced-motion)"),
        (
            "1000px@(prefers-reduced-motion)",
            "@media all and (min-width: 1000px) and (prefers-reduced-motion)",
        ),
        (
            "1000px@(prefers-color-scheme: dark)",
            "@media all and (min-width: 1000px) and (prefers-color-scheme: dark)",
        ),
    ];

    for (key, expected) in cases {
        assert_eq!(compiler.compile(key), expected, "key {key:?}");
    }
}

#[test]
fn expands_keys_in_range_context() {
    let config = CompilerConfig {
        use_mql4_range_context: true,
        ..bootstrap_config()
    };
    let mut compiler = StyleCompiler::new(config);

    let cases = [
        ("lt-500px", "@media all and (width < 500px)"),
        ("lte-500px", "@media all and (width <= 500px)"),
        ("gt-500px", "@media all and (width > 500px)"),
        ("gte-500px", "@media all and (width >= 500px)"),
        ("500px-to-900px", "@media all and (500px < width < 900px)"),
        ("xs-to-xl", "@media all and (0 < width < 1200px)"),
    ];

    for (key, expected) in cases {
        assert_eq!(compiler.compile_key(key), expected, "key {key:?}");
    }
}

#[test]
fn custom_epsilon() {
    let mut compiler = StyleCompiler::new(CompilerConfig {
        min_max_subtract: 0.5,
        ..bootstrap_config()
    });
    assert_eq!(compiler.compile_key("lt-md"), "@media all and (max-width: 767.5px)");
    assert_eq!(compiler.compile_key("gte-md"), "@media all and (min-width: 767.5px)");

    let mut exact = StyleCompiler::new(CompilerConfig {
        min_max_subtract: 0.0,
        ..bootstrap_config()
    });
    assert_eq!(exact.compile_key("md"), "@media all and (min-width: 768px) and (max-width: 992px)");
}

#[test]
fn features_receive_key_and_context() {
    let mut features = FeatureRegistry::new();
    features.register(
        "theme",
        |d: &mut MediaQueryDescriptor, _: &str, key: &str, ctx: Option<&dyn Any>| {
            let theme = ctx
                .and_then(|c| c.downcast_ref::<&str>())
                .copied()
                .unwrap_or("light");
            d.set("prefers-color-scheme", theme);
            d.set("x-key-length", key.len().to_string());
        },
    );
    let compiler = MediaQueryCompiler::from_config(&bootstrap_config(), features);

    let dark: &str = "dark";
    assert_eq!(
        compiler.compile_uncached("md@theme", Some(&dark)),
        "@media all and (min-width: 768px) and (max-width: 991.98px) \
         and (prefers-color-scheme: dark) and (x-key-length: 8)"
    );
    assert_eq!(
        compiler.compile_uncached("theme", None),
        "@media all and (prefers-color-scheme: light) and (x-key-length: 5)"
    );
}

#[test]
fn suffix_grammar_disabled() {
    let mut compiler = StyleCompiler::new(CompilerConfig {
        legacy_suffix_grammar: false,
        ..bootstrap_config()
    });
    assert_eq!(compiler.compile_key("md-up"), "@media all");
    assert_eq!(compiler.compile_key("gt-md"), "@media all and (min-width: 768px)");
}
