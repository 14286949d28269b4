//! The fixed, ordered catalog of QA steps

use crate::core::step::Step;
use anyhow::Result;
use std::collections::HashSet;

/// Ordered, read-only collection of steps. Order is execution order.
#[derive(Debug, Clone)]
pub struct StepRegistry {
    steps: Vec<Step>,
}

impl StepRegistry {
    /// Build a registry from custom steps, rejecting clashing names or aliases
    pub fn new(steps: Vec<Step>) -> Result<Self> {
        let mut seen = HashSet::new();
        for step in &steps {
            for key in step.keys() {
                if !seen.insert(key.to_string()) {
                    anyhow::bail!("Duplicate step key: {}", key);
                }
            }
        }

        Ok(Self { steps })
    }

    /// The standard PHP project catalog
    pub fn standard() -> Self {
        let steps = vec![
            Step::new("rector", "RECTOR", "{{ vendor_root }}vendor/bin/rector").mutating(),
            Step::new(
                "code-style-fixer",
                "PHP-CS-FIXER",
                "PHP_CS_FIXER_IGNORE_ENV=1 {{ vendor_root }}vendor/bin/php-cs-fixer fix",
            )
            .mutating()
            .with_alias("phpcsfixer"),
            Step::new("yaml-lint", "YAML LINT", "bin/console lint:yaml config")
                .then("bin/console lint:yaml src")
                .with_alias("lintyaml"),
            Step::new("template-lint", "TWIG LINT", "bin/console lint:twig src")
                .with_alias("linttwig"),
            Step::new(
                "style-checker",
                "PHPCS",
                "{{ vendor_root }}vendor/bin/phpcs --report=checkstyle --extensions=php src tests",
            )
            .with_alias("phpcs"),
            Step::new("unit-tests", "PHPUNIT", "bin/phpunit --configuration phpunit.xml.dist")
                .with_alias("phpunit"),
            Step::new(
                "mess-detector",
                "PHPMD",
                "{{ vendor_root }}vendor/bin/phpmd src,tests text controversial,unusedcode",
            )
            .with_alias("phpmd"),
            Step::new(
                "static-analyzer-a",
                "PHPSTAN",
                "php -d memory_limit=-1 {{ vendor_root }}vendor/bin/phpstan analyse src tests",
            )
            .with_alias("phpstan"),
            Step::new(
                "static-analyzer-b",
                "PSALM",
                "{{ vendor_root }}vendor/bin/psalm --show-info=true",
            )
            .with_alias("psalm"),
        ];

        Self { steps }
    }

    /// Steps in execution order
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Look up a step by name or alias
    pub fn get(&self, key: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.keys().any(|k| k == key))
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl Default for StepRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
