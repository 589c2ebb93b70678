use crate::summary::Lang;

/// Localized page and document labels
#[derive(Debug, Clone, Copy)]
pub struct Labels {
    pub report: &'static str,
    pub new_analysis: &'static str,
    pub tech: &'static str,
    pub content: &'static str,
    pub gdpr: &'static str,
    pub summary: &'static str,
    pub good: &'static str,
    pub issues: &'static str,
    pub steps: &'static str,
    pub overall_score: &'static str,
    pub date: &'static str,
    pub yes: &'static str,
    pub no: &'static str,
    pub viewport: &'static str,
    pub scripts: &'static str,
    pub images: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub cookie_hints: &'static str,
    pub detected: &'static str,
    pub missing: &'static str,
    pub privacy_link: &'static str,
    pub found: &'static str,
    pub not_found: &'static str,
    pub download_markdown: &'static str,
    pub download_pdf: &'static str,
}

static EN: Labels = Labels {
    report: "Report",
    new_analysis: "New analysis",
    tech: "Tech",
    content: "Content",
    gdpr: "GDPR & Trust",
    summary: "AI Summary",
    good: "What's good",
    issues: "Issues",
    steps: "Next steps",
    overall_score: "Overall score",
    date: "Date",
    yes: "Yes",
    no: "No",
    viewport: "Viewport meta",
    scripts: "Scripts",
    images: "Images",
    title: "Title",
    description: "Description",
    cookie_hints: "Cookie banner hints",
    detected: "Detected",
    missing: "Missing",
    privacy_link: "Privacy policy link",
    found: "Found",
    not_found: "Not found",
    download_markdown: "Download Markdown",
    download_pdf: "Download PDF",
};

static FI: Labels = Labels {
    report: "Raportti",
    new_analysis: "Uusi analyysi",
    tech: "Tekniikka",
    content: "Sisältö",
    gdpr: "GDPR ja luotettavuus",
    summary: "AI-yhteenveto",
    good: "Mikä toimii",
    issues: "Ongelmat",
    steps: "Seuraavat askeleet",
    overall_score: "Kokonaispisteet",
    date: "Päivämäärä",
    yes: "Kyllä",
    no: "Ei",
    viewport: "Viewport-meta",
    scripts: "Skriptit",
    images: "Kuvat",
    title: "Otsikko",
    description: "Kuvaus",
    cookie_hints: "Evästebannerin vihjeet",
    detected: "Havaittu",
    missing: "Puuttuu",
    privacy_link: "Tietosuojaselosteen linkki",
    found: "Löytyi",
    not_found: "Ei löytynyt",
    download_markdown: "Lataa Markdown",
    download_pdf: "Lataa PDF",
};

impl Labels {
    pub fn for_lang(lang: Lang) -> &'static Labels {
        match lang {
            Lang::En => &EN,
            Lang::Fi => &FI,
        }
    }

    pub fn yes_no(&self, value: bool) -> &'static str {
        if value {
            self.yes
        } else {
            self.no
        }
    }
}
