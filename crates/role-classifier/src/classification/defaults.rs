use super::rules::{CategoryId, CategoryRules, RuleBook};
use std::collections::BTreeMap;

// Most specialized first, broad/functional roles last.
const PRIORITY: &[&str] = &[
    "data_scientist",
    "data_ops",
    "analytics_engineer",
    "data_engineer",
    "business_analyst",
    "data_analyst",
];

struct CategorySource {
    id: &'static str,
    title_include: &'static [&'static str],
    title_exclude: &'static [&'static str],
    skills_include: &'static [&'static str],
    skills_exclude: &'static [&'static str],
}

// Patterns are kept literally, including those that can never fire after
// normalization (accented words, `ci/cd`).
const CATEGORIES: &[CategorySource] = &[
    CategorySource {
        id: "business_analyst",
        title_include: &[
            r"\bbusiness\b",
            r"\bbusiness analyst\b",
            r"\bbusiness intelligence\b",
            r"\banalyste métier\b",
            r"\banalyste fonctionnel\b",
            r"\bfunctional analyst\b",
            r"\banalista de negocio\b",
            r"\banalista funzionale\b",
            r"\bgeschäftsanalyst\b",
            r"\bmoa\b",
            r"\bBI analyst\b",
            r"\bBusiness Intelligence Analyst\b",
            r"\bconsultant(e)? fonctionnel(le)?\b",
        ],
        title_exclude: &[
            r"\bdata (analyst|scientist|engineer)\b",
            r"\bmachine learning\b",
            r"\bdata ops\b",
            r"\banalytics engineer\b",
        ],
        skills_include: &[
            r"\brequirements\b",
            r"\buser stories\b",
            r"\bprocess mapping\b",
            r"\buml\b",
            r"\bbpmn\b",
            r"\bcrm\b",
            r"\berp\b",
            r"\bmoa\b",
        ],
        skills_exclude: &[],
    },
    CategorySource {
        id: "data_scientist",
        title_include: &[
            r"\bdata scientist\b",
            r"\bscientist\b",
            r"\bscientifique des données\b",
            r"\bdata science\b",
            r"\bmachine learning\W",
            r"\bml engineer\b",
            r"\bml scientist\b",
            r"\bdeep learning\b",
            r"\bnlp\b",
        ],
        title_exclude: &[
            r"\banalyst\b",
            r"\bbusiness analyst\b",
            r"\bdata (analyst|engineer)\b",
        ],
        skills_include: &[
            r"\btensorflow\b",
            r"\bpytorch\b",
            r"\bscikit[- ]learn\b",
            r"\bnlp\b",
            r"\bdeep learning\b",
            r"\bxgboost\b",
            r"\blightgbm\b",
        ],
        skills_exclude: &[],
    },
    CategorySource {
        id: "analytics_engineer",
        title_include: &[
            r"\banalytics engineer\b",
            r"\bdata analytics engineer\b",
            r"\banalytics engineering\b",
            r"\bData Analyst & Engineer\b",
            r"\bdbt engineer\b",
        ],
        title_exclude: &[
            r"\banalyst\b",
            r"\bconsultant\b",
            r"\bspecialist\b",
            r"\bexpert\b",
            r"\blead\b",
            r"\bmanager\b",
            r"\barchitect\b",
            r"\bdeveloper\b",
            r"\bbi\b",
            r"\bmarketing\b",
            r"\bproduct\b",
        ],
        skills_include: &[
            r"\bdbt\b",
            r"\bdata modeling\b",
            r"\bdimensional modeling\b",
            r"\bsemantic layer\b",
            r"\bmetric layer\b",
        ],
        skills_exclude: &[
            r"\bpower bi\b",
            r"\btableau\b",
            r"\bexcel\b",
            r"\bbi\b",
            r"\breporting\b",
            r"\bvisuali(s|z)ation\b",
            r"\banalytics\b",
            r"\bconsult\b",
        ],
    },
    CategorySource {
        id: "data_ops",
        title_include: &[
            r"\bdata ?ops\b",
            r"\bdata operations\b",
            r"\bml ?ops\b",
            r"\bmlops\b",
            r"\bdata reliability\b",
            r"\bdata platform\b",
            r"\bdata infrastructure\b",
            r"\bingénieur plateforme\b",
        ],
        title_exclude: &[
            r"\banalyst\b",
            r"\bbusiness analyst\b",
            r"\bdata engineer\b",
            r"\bdata (analyst|scientist|engineer)\b",
        ],
        skills_include: &[
            r"\bairflow\b",
            r"\bmlflow\b",
            r"\bkubernetes\b",
            r"\bk8s\b",
            r"\bprometheus\b",
            r"\bgrafana\b",
            r"\bdocker\b",
            r"\bci/cd\b",
            r"\bmonitoring\b",
            r"\bterraform\b",
            r"\bdata quality\b",
        ],
        skills_exclude: &[],
    },
    CategorySource {
        id: "data_engineer",
        title_include: &[
            r"\bdata engineer\b",
            r"\bmodeller\b",
            r"\bengineer\b",
            r"\bingénieur\b",
            r"\bingénieur data\b",
            r"\bdata engineering\b",
            r"\bbig data engineer\b",
            r"\bcloud\b",
            r"\betl developer\b",
            r"\betl engineer\b",
            r"\bdata pipeline\b",
            r"\bpyspark\b",
            r"\bspark developer\b",
        ],
        title_exclude: &[
            r"\banalytics engineer\b",
            r"\banalyst\b",
            r"\bbusiness analyst\b",
            r"\bdata (analyst|scientist)\b",
        ],
        skills_include: &[
            r"\b(pyspark|spark)\b",
            r"\bairflow\b",
            r"\bkafka\b",
            r"\bdatabricks\b",
            r"\b(etl|elt)\b",
            r"\bs3\b",
            r"\bgcs\b",
            r"\bdata pipelines?\b",
        ],
        skills_exclude: &[],
    },
    CategorySource {
        id: "data_analyst",
        title_include: &[
            r"\banalyst\b",
            r"\banalyste\b",
            r"\banalist\b",
            r"\bstatistician\b",
            r"\bdata analyst\b",
            r"\banalyst(e)? data\b",
            r"\banalyste données\b",
            r"\banalista de datos\b",
            r"\bdatenanalyst\b",
            r"\banalista dati\b",
            r"\breporting analyst\b",
            r"\binsights analyst\b",
            r"\bproduct analyst\b",
        ],
        title_exclude: &[
            r"\bbusiness analyst\b",
            r"\bproduct analyst\b",
            r"\bbi analyst\b",
            r"\bpower bi developer\b",
        ],
        skills_include: &[
            r"\bsql\b",
            r"\btableau\b",
            r"\bpower bi\b",
            r"\bexcel\b",
            r"\bdata visualization\b",
            r"\bga\b",
            r"\blook(er)? studio\b",
            r"\bdashboard\b",
        ],
        skills_exclude: &[],
    },
];

fn owned(patterns: &[&str]) -> Vec<String> {
    patterns.iter().map(|pattern| pattern.to_string()).collect()
}

impl RuleBook {
    /// Built-in European data job market rule set.
    pub fn standard() -> Self {
        let mut categories = BTreeMap::new();
        for source in CATEGORIES {
            categories.insert(
                CategoryId::from(source.id),
                CategoryRules {
                    title_include: owned(source.title_include),
                    title_exclude: owned(source.title_exclude),
                    skills_include: owned(source.skills_include),
                    skills_exclude: owned(source.skills_exclude),
                },
            );
        }

        Self {
            categories,
            priority: PRIORITY.iter().map(|id| CategoryId::from(*id)).collect(),
        }
    }
}
